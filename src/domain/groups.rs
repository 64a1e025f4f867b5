//! Random group partitioning
//!
//! Splits the full entry list into near-equal groups. Names are shuffled
//! once and then cut into contiguous chunks; the first `len % n` groups
//! take one extra member.

use rand::Rng;

use crate::domain::entries::shuffle_slice;

/// Errors that can occur while generating or exporting groups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    /// Fewer than two names were supplied
    #[error("You need at least 2 names to create groups!")]
    TooFewNames { count: usize },

    /// Export was requested before any groups were generated
    #[error("No groups to {action}!")]
    NoGroups { action: &'static str },
}

/// Ordered members of one group
pub type Group = Vec<String>;

/// Result of one partition request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet {
    groups: Vec<Group>,
}

impl GroupSet {
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of members across all groups
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Plain-text export used for download and clipboard copy
    ///
    /// # Example
    /// ```text
    /// Group 1:
    ///   - Alice
    ///   - Carol
    ///
    /// Group 2:
    ///   - Bob
    ///
    /// ```
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (index, group) in self.groups.iter().enumerate() {
            text.push_str(&format!("Group {}:\n", index + 1));
            for member in group {
                text.push_str(&format!("  - {member}\n"));
            }
            text.push('\n');
        }
        text
    }
}

/// Default number of groups when neither hint is usable
pub const DEFAULT_GROUP_COUNT: usize = 3;

/// Resolves the number of groups from the two optional form hints
///
/// A positive count hint wins and is capped at the number of names. A
/// positive size hint is used next, rounding the group count up. Otherwise
/// `default_count` applies, also capped at the number of names.
pub fn resolve_group_count(
    name_count: usize,
    count_hint: Option<usize>,
    size_hint: Option<usize>,
    default_count: usize,
) -> usize {
    let resolved = match (count_hint.filter(|&n| n > 0), size_hint.filter(|&n| n > 0)) {
        (Some(count), _) => count,
        (None, Some(size)) => name_count.div_ceil(size),
        (None, None) => default_count,
    };
    resolved.clamp(1, name_count.max(1))
}

/// Parses a group hint typed into a form field
///
/// Leading whitespace is ignored and the leading run of digits is read, so
/// `"4 groups"` yields 4. Zero, blanks and non-numeric text yield None.
pub fn parse_hint(raw: &str) -> Option<usize> {
    let trimmed = raw.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end]
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
}

/// Splits `len` members into `group_count` sizes differing by at most one
pub fn group_sizes(len: usize, group_count: usize) -> Vec<usize> {
    if group_count == 0 {
        return Vec::new();
    }

    let base = len / group_count;
    let remainder = len % group_count;
    (0..group_count)
        .map(|i| base + usize::from(i < remainder))
        .collect()
}

/// Randomly partitions `names` into near-equal groups
///
/// # Arguments
/// * `names` - Participants; at least two are required
/// * `count_hint` - Requested number of groups
/// * `size_hint` - Requested members per group, used when no count is given
/// * `rng` - Randomness source for the shuffle
///
/// # Returns
/// A fresh GroupSet or `GroupError::TooFewNames`
pub fn partition<R: Rng + ?Sized>(
    names: &[String],
    count_hint: Option<usize>,
    size_hint: Option<usize>,
    rng: &mut R,
) -> Result<GroupSet, GroupError> {
    partition_with_default(names, count_hint, size_hint, DEFAULT_GROUP_COUNT, rng)
}

/// Same as [`partition`] with a configurable fallback group count
pub fn partition_with_default<R: Rng + ?Sized>(
    names: &[String],
    count_hint: Option<usize>,
    size_hint: Option<usize>,
    default_count: usize,
    rng: &mut R,
) -> Result<GroupSet, GroupError> {
    if names.len() < 2 {
        return Err(GroupError::TooFewNames { count: names.len() });
    }

    let group_count = resolve_group_count(names.len(), count_hint, size_hint, default_count);

    let mut shuffled = names.to_vec();
    shuffle_slice(&mut shuffled, rng);

    let mut groups: Vec<Group> = Vec::with_capacity(group_count);
    let mut members = shuffled.into_iter();
    for size in group_sizes(names.len(), group_count) {
        groups.push(members.by_ref().take(size).collect());
    }

    Ok(GroupSet { groups })
}
