//! Entry list parsing and mutation
//!
//! The entry list is the ordered set of participant names shared by the
//! wheel and the group generator. Order matters: it decides slice order on
//! the wheel and display order everywhere else.

use rand::Rng;

/// Errors produced by entry list operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    /// Raw input contained no usable names
    #[error("Please enter some names first!")]
    EmptyInput,

    /// Operation needs at least one entry
    #[error("No entries to {action}!")]
    NoEntries { action: &'static str },

    /// Remove-winner was requested with no recorded winner
    #[error("No winner to remove!")]
    NoWinner,
}

/// Ordered list of non-empty, trimmed participant names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<String>,
}

impl EntryList {
    /// Creates an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses free text into an entry list
    ///
    /// Splits on line breaks, trims every line and drops blank ones. The
    /// remaining order is preserved.
    ///
    /// # Returns
    /// The parsed list, or `EntryError::EmptyInput` if nothing survived
    ///
    /// # Example
    /// ```rust
    /// use prize_wheel::domain::entries::EntryList;
    ///
    /// let list = EntryList::parse("a\n\nb \n c\n").unwrap();
    /// assert_eq!(list.as_slice(), ["a", "b", "c"]);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, EntryError> {
        let entries: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        if entries.is_empty() {
            return Err(EntryError::EmptyInput);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Shuffles the list in place with an unbiased Fisher-Yates pass
    ///
    /// For every index from last to first, swaps with a uniformly chosen
    /// index in `[0, i]`.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle_slice(&mut self.entries, rng);
    }

    /// Removes the first entry equal to `entry`
    ///
    /// # Returns
    /// true if an entry was removed, false if it was not present
    pub fn remove_entry(&mut self, entry: &str) -> bool {
        match self.entries.iter().position(|e| e == entry) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empties the list
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Joins the entries back into the newline separated input form
    pub fn to_text(&self) -> String {
        self.entries.join("\n")
    }
}

/// Counts the non-blank lines of raw input, as shown by the live counter
pub fn entry_count(raw: &str) -> usize {
    raw.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Fisher-Yates shuffle shared by the entry list and the group generator
pub fn shuffle_slice<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
