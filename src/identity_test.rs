use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

// =============================================================
// start_user
// =============================================================

#[test]
fn start_user_has_prefix_and_five_alphanumeric_chars() {
    let mut rng = StdRng::seed_from_u64(7);
    let name = start_user(&mut rng);

    let suffix = name.strip_prefix(ANON_PREFIX).expect("anon prefix");
    assert_eq!(suffix.len(), ANON_SUFFIX_LEN);
    assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn start_user_is_deterministic_for_a_seed() {
    let a = start_user(&mut StdRng::seed_from_u64(42));
    let b = start_user(&mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn start_user_is_always_a_valid_name() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        assert!(is_valid_user(&start_user(&mut rng)));
    }
}

// =============================================================
// is_valid_user
// =============================================================

#[test]
fn empty_and_whitespace_names_are_invalid() {
    assert!(!is_valid_user(""));
    assert!(!is_valid_user("   "));
    assert!(!is_valid_user("\t\n"));
}

#[test]
fn names_up_to_limit_are_valid() {
    assert!(is_valid_user("a"));
    assert!(is_valid_user(&"x".repeat(MAX_USER_LEN)));
}

#[test]
fn names_over_limit_are_invalid() {
    assert!(!is_valid_user(&"x".repeat(MAX_USER_LEN + 1)));
}

#[test]
fn limit_applies_after_trim() {
    let padded = format!("  {}  ", "x".repeat(MAX_USER_LEN));
    assert!(is_valid_user(&padded));
}

#[test]
fn limit_counts_characters_not_bytes() {
    let name = "é".repeat(MAX_USER_LEN);
    assert!(name.len() > MAX_USER_LEN);
    assert!(is_valid_user(&name));
}

// =============================================================
// UserField
// =============================================================

#[test]
fn user_field_stores_trimmed_name() {
    let field = UserField::new("  bob  ");
    assert_eq!(field.name(), "bob");
    assert!(field.is_valid());
}

#[test]
fn user_field_set_revalidates_on_every_change() {
    let mut field = UserField::new("bob");
    assert!(!field.set("   "));
    assert!(!field.is_valid());
    assert_eq!(field.name(), "");

    assert!(field.set("carol"));
    assert!(field.is_valid());
    assert_eq!(field.name(), "carol");
}

#[test]
fn user_field_keeps_overlong_name_but_marks_invalid() {
    let long = "y".repeat(MAX_USER_LEN + 3);
    let field = UserField::new(&long);
    assert_eq!(field.name(), long);
    assert!(!field.is_valid());
}

#[test]
fn generated_user_field_is_valid_anon_name() {
    let field = UserField::generated();
    assert!(field.name().starts_with(ANON_PREFIX));
    assert!(field.is_valid());
}
