use quiz_types::ValidationError;
use rand::Rng;

pub const ROOM_CODE_LEN: usize = 6;
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Uniform random draw of 6 characters from [A-Z0-9]. Uniqueness is the
/// caller's job: re-roll on collision, never accept a duplicate.
pub fn generate_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_LEN)
        .map(|_| CODE_CHARS[rng.gen_range(0..CODE_CHARS.len())] as char)
        .collect()
}

pub fn is_valid_room_code(code: &str) -> bool {
    code.len() == ROOM_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Trim and uppercase user input, then check the shape.
pub fn normalize_room_code(input: &str) -> Result<String, ValidationError> {
    let code = input.trim().to_uppercase();
    if !is_valid_room_code(&code) {
        return Err(ValidationError::BadRoomCode);
    }
    Ok(code)
}
