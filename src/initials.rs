/// Number of letter slots in a leaderboard name.
pub const INITIALS_LEN: usize = 3;

/// Three-slot initials editor shown after a qualifying run.
///
/// Slots start at `A` with the cursor on the first slot. Stepping a slot
/// cycles through `A..=Z` with wrap-around; typing a letter fills the slot
/// under the cursor and moves right.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct InitialsEntry {
    letters: [u8; INITIALS_LEN],
    cursor: usize,
}

impl Default for InitialsEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl InitialsEntry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            letters: [b'A'; INITIALS_LEN],
            cursor: 0,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn letters(&self) -> [char; INITIALS_LEN] {
        self.letters.map(char::from)
    }

    /// Current name, always three uppercase letters.
    #[must_use]
    pub fn name(&self) -> String {
        self.letters.iter().copied().map(char::from).collect()
    }

    /// Next letter in the slot under the cursor (`Z` wraps to `A`).
    pub fn step_up(&mut self) {
        let slot = &mut self.letters[self.cursor];
        *slot = if *slot >= b'Z' { b'A' } else { *slot + 1 };
    }

    /// Previous letter in the slot under the cursor (`A` wraps to `Z`).
    pub fn step_down(&mut self) {
        let slot = &mut self.letters[self.cursor];
        *slot = if *slot <= b'A' { b'Z' } else { *slot - 1 };
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(INITIALS_LEN - 1);
    }

    /// Writes `letter` under the cursor and advances. Non-letters are ignored.
    pub fn type_letter(&mut self, letter: char) {
        if !letter.is_ascii_alphabetic() {
            return;
        }
        // ASCII alphabetic, so the byte conversion is lossless.
        self.letters[self.cursor] = letter.to_ascii_uppercase() as u8;
        self.move_right();
    }
}

#[cfg(test)]
mod tests {
    use super::InitialsEntry;

    #[test]
    fn starts_as_aaa_on_first_slot() {
        let entry = InitialsEntry::new();

        assert_eq!(entry.name(), "AAA");
        assert_eq!(entry.cursor(), 0);
    }

    #[test]
    fn stepping_wraps_the_alphabet() {
        let mut entry = InitialsEntry::new();

        entry.step_down();
        assert_eq!(entry.name(), "ZAA");

        entry.step_up();
        assert_eq!(entry.name(), "AAA");

        entry.step_up();
        entry.step_up();
        assert_eq!(entry.name(), "CAA");
    }

    #[test]
    fn cursor_is_clamped_to_slots() {
        let mut entry = InitialsEntry::new();

        entry.move_left();
        assert_eq!(entry.cursor(), 0);

        entry.move_right();
        entry.move_right();
        entry.move_right();
        assert_eq!(entry.cursor(), 2);

        entry.step_up();
        assert_eq!(entry.name(), "AAB");
    }

    #[test]
    fn typing_fills_slots_and_advances() {
        let mut entry = InitialsEntry::new();

        entry.type_letter('b');
        entry.type_letter('O');
        assert_eq!(entry.cursor(), 2);

        entry.type_letter('b');
        entry.type_letter('x');
        assert_eq!(entry.name(), "BOX");
        assert_eq!(entry.cursor(), 2);
    }

    #[test]
    fn typing_non_letters_is_ignored() {
        let mut entry = InitialsEntry::new();

        entry.type_letter('4');
        entry.type_letter('é');

        assert_eq!(entry.name(), "AAA");
        assert_eq!(entry.cursor(), 0);
    }
}
