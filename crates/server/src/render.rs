//! Server-rendered HTML.
//!
//! Fragments are swapped into the page by htmx; only [`index_page`] produces
//! a full document. Every user-supplied string goes through [`escape`].

use teamroster_api::{Team, TeamDetailResponse, TeamMember};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";

/// htmx does not swap 4xx/5xx responses. Show their plain-text body in
/// `#error` instead, and clear it after the next successful request.
const ERROR_SCRIPT: &str = r#"<script>
document.body.addEventListener("htmx:responseError", (event) => {
  document.getElementById("error").textContent = event.detail.xhr.responseText;
});
document.body.addEventListener("htmx:afterRequest", (event) => {
  if (event.detail.successful) document.getElementById("error").textContent = "";
});
</script>"#;

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page: create-team form, team list, and an empty detail pane.
pub fn index_page(teams: &[Team]) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Team Management</title>
<script src="{HTMX_SRC}"></script>
</head>
<body>
<h1>Teams</h1>
<form hx-post="/teams" hx-target="#team-list" hx-swap="outerHTML" hx-on::after-request="if(event.detail.successful) this.reset()">
<input type="text" name="name" placeholder="Team name" required>
<button type="submit">Add team</button>
</form>
<p id="error" class="error" role="alert"></p>
{list}
<section id="team-detail"></section>
{ERROR_SCRIPT}
</body>
</html>
"##,
        list = teams_list(teams),
    )
}

/// `<ul id="team-list">` with one entry per team.
pub fn teams_list(teams: &[Team]) -> String {
    if teams.is_empty() {
        return "<ul id=\"team-list\"><li class=\"empty\">No teams yet</li></ul>".to_string();
    }
    let mut out = String::from("<ul id=\"team-list\">");
    for team in teams {
        out.push_str(&format!(
            "<li id=\"team-{id}\"><a href=\"#\" hx-get=\"/teams/{id}\" hx-target=\"#team-detail\">{name}</a></li>",
            id = team.id,
            name = escape(&team.name),
        ));
    }
    out.push_str("</ul>");
    out
}

/// Team heading, add-member form and the member list.
pub fn team_detail(detail: &TeamDetailResponse) -> String {
    let team = &detail.team;
    format!(
        r##"<div class="team-detail" data-team-id="{id}">
<h2>{name}</h2>
<p class="created">Created {created}</p>
<form hx-post="/teams/{id}/members" hx-target="#member-list" hx-swap="outerHTML" hx-on::after-request="if(event.detail.successful) this.reset()">
<input type="text" name="name" placeholder="Member name" required>
<input type="text" name="role" placeholder="Role">
<button type="submit">Add member</button>
</form>
{members}
</div>"##,
        id = team.id,
        name = escape(&team.name),
        created = escape(&team.created_at),
        members = members_list(detail),
    )
}

/// `<ul id="member-list">` for one team.
pub fn members_list(detail: &TeamDetailResponse) -> String {
    let mut out = format!(
        "<ul id=\"member-list\" data-team-id=\"{}\">",
        detail.team.id
    );
    if detail.members.is_empty() {
        out.push_str("<li class=\"empty\">No members yet</li>");
    }
    for member in &detail.members {
        out.push_str(&member_item(member));
    }
    out.push_str("</ul>");
    out
}

fn member_item(member: &TeamMember) -> String {
    let role = member
        .role
        .as_deref()
        .map(|r| format!(" <span class=\"role\">{}</span>", escape(r)))
        .unwrap_or_default();
    format!(
        "<li id=\"member-{id}\"><span class=\"name\">{name}</span>{role} \
         <button hx-delete=\"/members/{id}\" hx-target=\"#member-list\" hx-swap=\"outerHTML\">Remove</button></li>",
        id = member.id,
        name = escape(&member.name),
    )
}
