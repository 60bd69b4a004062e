use course_feedback::{
    guard::{Navigation, Page, evaluate, resolve},
    models::{Identity, Role, Session},
};

fn signed_in(role: Role) -> Session {
    Session::Authenticated(Identity {
        role,
        display_name: "Test User".to_string(),
        identifier: "T-1".to_string(),
        email: "test@uni.edu".to_string(),
    })
}

fn redirect(to: &str) -> Navigation {
    Navigation::Redirect { to: to.to_string() }
}

// --- evaluate ---

#[test]
fn test_unauthenticated_is_sent_to_login_for_any_requirement() {
    for required in [None, Some(Role::Student), Some(Role::Faculty)] {
        assert_eq!(evaluate(&Session::Unauthenticated, required), redirect("/"));
    }
}

#[test]
fn test_role_mismatch_goes_to_required_roles_home() {
    assert_eq!(
        evaluate(&signed_in(Role::Student), Some(Role::Faculty)),
        redirect("/admin")
    );
    assert_eq!(
        evaluate(&signed_in(Role::Faculty), Some(Role::Student)),
        redirect("/student")
    );
}

#[test]
fn test_matching_role_renders() {
    assert_eq!(
        evaluate(&signed_in(Role::Faculty), Some(Role::Faculty)),
        Navigation::Render
    );
    assert_eq!(
        evaluate(&signed_in(Role::Student), Some(Role::Student)),
        Navigation::Render
    );
    assert_eq!(evaluate(&signed_in(Role::Student), None), Navigation::Render);
}

// --- resolve ---

#[test]
fn test_public_pages_render_for_everyone() {
    for session in [
        Session::Unauthenticated,
        signed_in(Role::Student),
        signed_in(Role::Faculty),
    ] {
        for path in ["/", "/register", "/forgot-password"] {
            assert_eq!(resolve(&session, path), Navigation::Render, "{path}");
        }
    }
}

#[test]
fn test_unknown_paths_go_to_login() {
    assert_eq!(resolve(&signed_in(Role::Student), "/nowhere"), redirect("/"));
    assert_eq!(resolve(&Session::Unauthenticated, "/form/extra"), redirect("/"));
}

#[test]
fn test_only_builder_endpoints_count_as_builder_page() {
    let faculty = signed_in(Role::Faculty);
    assert_eq!(resolve(&faculty, "/create/bogus"), redirect("/"));
    assert_eq!(resolve(&faculty, "/create/questions/x"), redirect("/"));
    assert_eq!(resolve(&faculty, "/create/questions"), Navigation::Render);
    assert_eq!(resolve(&faculty, "/create/questions/4"), Navigation::Render);
}

#[test]
fn test_protected_pages_send_unauthenticated_to_login() {
    for page in Page::ALL.into_iter().filter(|p| p.required_role().is_some()) {
        assert_eq!(
            resolve(&Session::Unauthenticated, page.path()),
            redirect("/"),
            "{}",
            page.path()
        );
    }
}

#[test]
fn test_wrong_role_lands_on_own_home() {
    let student = signed_in(Role::Student);
    for path in ["/admin", "/create", "/create/questions/0", "/analytics"] {
        assert_eq!(resolve(&student, path), redirect("/student"), "{path}");
    }

    let faculty = signed_in(Role::Faculty);
    for path in ["/student", "/form"] {
        assert_eq!(resolve(&faculty, path), redirect("/admin"), "{path}");
    }
}

#[test]
fn test_resolved_redirects_always_render() {
    // Following a redirect never leads to a second redirect.
    for session in [
        Session::Unauthenticated,
        signed_in(Role::Student),
        signed_in(Role::Faculty),
    ] {
        for page in Page::ALL {
            if let Navigation::Redirect { to } = resolve(&session, page.path()) {
                assert_eq!(resolve(&session, &to), Navigation::Render, "{to}");
            }
        }
    }
}

#[test]
fn test_own_pages_render() {
    let student = signed_in(Role::Student);
    assert_eq!(resolve(&student, "/student"), Navigation::Render);
    assert_eq!(resolve(&student, "/form/"), Navigation::Render);

    let faculty = signed_in(Role::Faculty);
    for path in ["/admin", "/create", "/analytics"] {
        assert_eq!(resolve(&faculty, path), Navigation::Render, "{path}");
    }
}
