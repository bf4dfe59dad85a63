use relay_cache::{fingerprint, fingerprint_request};
use relay_core::{CompletionRequest, Message};

#[test]
fn deterministic_for_identical_input() {
    let a = fingerprint(["resume text", "job description"], "bullet-rewrite");
    let b = fingerprint(["resume text", "job description"], "bullet-rewrite");
    assert_eq!(a, b);
}

#[test]
fn reordered_fragments_differ() {
    let a = fingerprint(["resume text", "job description"], "bullet-rewrite");
    let b = fingerprint(["job description", "resume text"], "bullet-rewrite");
    assert_ne!(a, b);
}

#[test]
fn single_character_difference_differs() {
    let a = fingerprint(["led a team of 5"], "bullet-rewrite");
    let b = fingerprint(["led a team of 6"], "bullet-rewrite");
    assert_ne!(a, b);
}

#[test]
fn service_id_scopes_identical_fragments() {
    let a = fingerprint(["same profile text"], "linkedin-optimize");
    let b = fingerprint(["same profile text"], "resume-rewrite");
    assert_ne!(a, b);
}

#[test]
fn whitespace_variants_normalize_to_same_fingerprint() {
    let a = fingerprint(["  Led a   team\tof 5\n"], "bullet-rewrite");
    let b = fingerprint(["Led a team of 5"], "bullet-rewrite");
    assert_eq!(a, b);
}

#[test]
fn casing_is_significant() {
    let a = fingerprint(["led a team"], "bullet-rewrite");
    let b = fingerprint(["Led a team"], "bullet-rewrite");
    assert_ne!(a, b);
}

#[test]
fn fragment_boundaries_are_unambiguous() {
    // "ab" + "c" must not collide with "a" + "bc".
    let a = fingerprint(["ab", "c"], "svc");
    let b = fingerprint(["a", "bc"], "svc");
    assert_ne!(a, b);
}

#[test]
fn separator_like_content_cannot_forge_boundaries() {
    // A control character inside a fragment must not make one fragment
    // look like two.
    let a = fingerprint(["a\u{1f}b"], "svc");
    let b = fingerprint(["a", "b"], "svc");
    assert_ne!(a, b);
}

#[test]
fn request_fingerprint_covers_roles_and_order() {
    let request = CompletionRequest::new(vec![
        Message::system("You rewrite resume bullets."),
        Message::human("Improve my resume bullet about leading a team"),
    ]);
    let swapped = CompletionRequest::new(vec![
        Message::human("You rewrite resume bullets."),
        Message::system("Improve my resume bullet about leading a team"),
    ]);

    let a = fingerprint_request(&request, "bullet-rewrite");
    assert_eq!(a, fingerprint_request(&request, "bullet-rewrite"));
    assert_ne!(a, fingerprint_request(&swapped, "bullet-rewrite"));
    assert_ne!(a, fingerprint_request(&request, "interview-prep"));
}
