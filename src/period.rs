// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Fiscal period labels and their chronological ordering.
//!
//! Labels look like `2022-1Q`, `2022/Annual` or `2021-Semi`. The year is the
//! leading four characters; the sub-period tag follows a separator. Labels
//! that do not parse are never rejected, they just sort late.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Rank assigned to tags that are missing or not in the rank table.
pub const UNKNOWN_RANK: u8 = 5;

/// Sub-period tag of a fiscal period
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubPeriod {
    Q1,
    Q2,
    Semi,
    Q3,
    Q4,
    Annual,
    Unknown(String),
}

impl SubPeriod {
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "1Q" => SubPeriod::Q1,
            "2Q" => SubPeriod::Q2,
            "Semi" => SubPeriod::Semi,
            "3Q" => SubPeriod::Q3,
            "4Q" => SubPeriod::Q4,
            "Annual" => SubPeriod::Annual,
            other => SubPeriod::Unknown(other.to_string()),
        }
    }

    /// Position within the fiscal year. Semi ranks with 2Q and Annual with 4Q.
    pub fn rank(&self) -> u8 {
        match self {
            SubPeriod::Q1 => 1,
            SubPeriod::Q2 | SubPeriod::Semi => 2,
            SubPeriod::Q3 => 3,
            SubPeriod::Q4 | SubPeriod::Annual => 4,
            SubPeriod::Unknown(_) => UNKNOWN_RANK,
        }
    }
}

/// A parsed fiscal period. The original label is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Period {
    label: String,
    year: Option<i32>,
    sub_period: SubPeriod,
}

impl Period {
    pub fn parse(label: &str) -> Self {
        let year = label.get(..4).and_then(|y| y.parse::<i32>().ok());
        Self {
            label: label.to_string(),
            year,
            sub_period: SubPeriod::parse(extract_tag(label)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn sub_period(&self) -> &SubPeriod {
        &self.sub_period
    }

    pub fn rank(&self) -> u8 {
        self.sub_period.rank()
    }

    /// Short axis label: `2023.1Q` for `2023-1Q`.
    pub fn short_label(&self) -> String {
        let chars: Vec<char> = self.label.chars().collect();
        let head: String = chars.iter().take(4).collect();
        let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
        format!("{}.{}", head, tail)
    }
}

/// Segment between the first and second `-` or `/`; without a separator,
/// everything from the sixth character on.
fn extract_tag(label: &str) -> &str {
    let tag = label
        .split_once(['-', '/'])
        .and_then(|(_, rest)| rest.split(['-', '/']).next());
    match tag {
        Some(tag) if !tag.is_empty() => tag,
        _ => label.get(5..).unwrap_or(""),
    }
}

impl From<String> for Period {
    fn from(label: String) -> Self {
        Period::parse(&label)
    }
}

impl From<&str> for Period {
    fn from(label: &str) -> Self {
        Period::parse(label)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.label
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Chronological comparator usable with `sort_by`.
///
/// Years compare first; a label without a parseable year sorts after every
/// dated label. Within a year the tag rank decides. Equal year and rank is
/// `Equal`, so a stable sort keeps input order for ties.
pub fn compare_periods(a: &Period, b: &Period) -> Ordering {
    let by_year = match (a.year, b.year) {
        (Some(ya), Some(yb)) => ya.cmp(&yb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_year.then_with(|| a.rank().cmp(&b.rank()))
}

/// Sort period labels chronologically.
pub fn sort_labels(labels: &[&str]) -> Vec<String> {
    let mut periods: Vec<Period> = labels.iter().map(|l| Period::parse(l)).collect();
    periods.sort_by(compare_periods);
    periods.into_iter().map(String::from).collect()
}
