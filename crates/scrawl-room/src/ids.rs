//! Room codes, session identifiers, and the mutation clock.

use std::time::Instant;

use rand::Rng;
use scrawl_protocol::{RoomCode, SessionId};

/// Characters a room code is drawn from. Uppercase hex reads well on a TV
/// across the living room.
const ROOM_CODE_ALPHABET: &[u8] = b"0123456789ABCDEF";

/// Generates a random room code of `len` characters (at least one).
pub fn generate_room_code(len: usize) -> RoomCode {
    let mut rng = rand::rng();
    let code = (0..len.max(1))
        .map(|_| {
            let idx = rng.random_range(0..ROOM_CODE_ALPHABET.len());
            ROOM_CODE_ALPHABET[idx] as char
        })
        .collect();
    RoomCode(code)
}

/// Generates a room code guaranteed to differ from `previous`.
pub(crate) fn next_room_code(len: usize, previous: &RoomCode) -> RoomCode {
    loop {
        let code = generate_room_code(len);
        if &code != previous {
            return code;
        }
    }
}

/// Generates a fresh session identifier: 32 hex characters, 128 bits of
/// randomness.
///
/// For client adapters that don't have an identifier for their device yet.
/// The room itself never calls this; sessions are always supplied.
pub fn new_session_id() -> SessionId {
    let bytes: [u8; 16] = rand::rng().random();
    SessionId(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

/// Source of `updated_at` values.
///
/// Milliseconds since the room was created, but never repeating: two
/// mutations inside the same millisecond still get distinct, increasing
/// stamps, so a poller comparing `updated_at` never misses a change.
#[derive(Debug)]
pub(crate) struct MutationClock {
    started: Instant,
    last: u64,
}

impl MutationClock {
    pub(crate) fn new() -> Self {
        Self {
            started: Instant::now(),
            last: 0,
        }
    }

    /// Returns the next stamp, strictly greater than the previous one.
    pub(crate) fn tick(&mut self) -> u64 {
        let now = self.started.elapsed().as_millis() as u64;
        self.last = now.max(self.last + 1);
        self.last
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_has_requested_length_and_alphabet() {
        let code = generate_room_code(6);
        assert_eq!(code.as_str().len(), 6);
        assert!(code
            .as_str()
            .bytes()
            .all(|b| ROOM_CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_room_code_length_zero_is_clamped() {
        assert_eq!(generate_room_code(0).as_str().len(), 1);
    }

    #[test]
    fn test_next_room_code_differs_from_previous() {
        // With a single character there are only 16 codes, so a naive
        // generator would repeat often.
        let mut previous = generate_room_code(1);
        for _ in 0..200 {
            let next = next_room_code(1, &previous);
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_session_id_is_32_hex_chars() {
        let sid = new_session_id();
        assert_eq!(sid.as_str().len(), 32);
        assert!(sid.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_session_id(), sid);
    }

    #[test]
    fn test_mutation_clock_is_strictly_increasing() {
        let mut clock = MutationClock::new();
        let mut last = 0;
        for _ in 0..1000 {
            let stamp = clock.tick();
            assert!(stamp > last);
            last = stamp;
        }
    }
}
