use super::*;

#[test]
fn hash_short_is_stable_and_16_chars() {
    let a = hash_short("You are a helpful assistant.");
    let b = hash_short("You are a helpful assistant.");
    assert_eq!(a, b);
    assert_eq!(a.len(), 16);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn hash_short_differs_on_single_char_change() {
    assert_ne!(
        hash_short("You are a helpful assistant."),
        hash_short("You are a helpful assistant!")
    );
}

#[test]
fn hash_to_u64_is_deterministic() {
    let key = b"qa:tenantA:v1:abcd:v1:1234";
    assert_eq!(hash_to_u64(key), hash_to_u64(key));
    assert_ne!(hash_to_u64(key), hash_to_u64(b"qa:tenantB:v1:abcd:v1:1234"));
}

#[test]
fn sys_prompt_hash_matches_hash_short() {
    assert_eq!(sys_prompt_hash("prompt"), hash_short("prompt"));
}
