use crate::{
    guard::{LOGIN_PATH, Page},
    models::{NavLink, NavShell, Role, Session},
};

/// nav_shell
///
/// The header for `current_path`. Hidden (`None`) when nobody is signed in and on the login and
/// registration pages.
pub fn nav_shell(session: &Session, current_path: &str) -> Option<NavShell> {
    if current_path == LOGIN_PATH || current_path == Page::Register.path() {
        return None;
    }
    let identity = session.identity()?;

    let display_name = if identity.display_name.is_empty() {
        "User".to_string()
    } else {
        identity.display_name.clone()
    };

    Some(NavShell {
        home: identity.role.home_path().to_string(),
        links: links_for(identity.role),
        initials: initials(&identity.display_name),
        display_name,
        role_label: identity.role.label().to_string(),
    })
}

fn links_for(role: Role) -> Vec<NavLink> {
    let pages: &[(&str, Page)] = match role {
        Role::Student => &[
            ("Dashboard", Page::StudentDashboard),
            ("Submit Feedback", Page::FeedbackForm),
        ],
        Role::Faculty => &[
            ("Dashboard", Page::FacultyDashboard),
            ("Create Form", Page::FormBuilder),
            ("Analytics", Page::Analytics),
        ],
    };

    pages
        .iter()
        .map(|(label, page)| NavLink {
            label: label.to_string(),
            path: page.path().to_string(),
        })
        .collect()
}

/// First letter of every space-separated part of the name, uppercased.
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
