//! Variant grouping: decides which file names are variants of the same part.
//!
//! The rule works on file stems. A trailing run of digits (optionally after
//! `_` or `-`) is treated as a variant number when the text before it ends in
//! a letter, so `clothing1` and `clothing2` form the family `clothing`.
//! Digits that follow a protected marker such as the `p` in `SV_AccA_p01`
//! are part numbers and stay in the family name. A layer digit placed just
//! before that marker (`SV_Clothing1_p01`) still counts as a variant.
//!
//! Mask sheets (`SV_AccA_p01_c.png`, `Face_p01_c1.png`) join the family of
//! their main sheet and are listed after it.
//!
//! Everything here is pure: no filesystem access, no UI.

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configurable rule for splitting a stem into family name and variant number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantRule {
    /// Longest digit run treated as a variant number. `0` disables grouping.
    pub max_suffix_digits: usize,
    /// Accept a `_` or `-` between the name and the variant number.
    pub allow_separator: bool,
    /// Letter tokens whose trailing digits are part numbers, not variants.
    pub protected_markers: Vec<String>,
    /// Treat a digit run right before a trailing `_<marker>NN` as a variant.
    pub layer_before_marker: bool,
    /// Suffix tokens (`_c`, `-c2`) that mark a stem as a mask sheet.
    pub mask_markers: Vec<String>,
    /// Compare family names ignoring ASCII case.
    pub case_insensitive: bool,
}

impl Default for VariantRule {
    fn default() -> Self {
        Self {
            max_suffix_digits: 2,
            allow_separator: true,
            protected_markers: vec!["p".to_string()],
            layer_before_marker: true,
            mask_markers: vec!["c".to_string()],
            case_insensitive: true,
        }
    }
}

/// `(?:a|b)` over the escaped tokens, or `None` when there are none.
fn alternation(tokens: &[String]) -> Option<String> {
    let escaped: Vec<String> = tokens
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        None
    } else {
        Some(format!("(?:{})", escaped.join("|")))
    }
}

impl VariantRule {
    /// Compiles the rule into a matcher usable by [`group_file_names`].
    pub fn compile(&self) -> Result<VariantMatcher> {
        let suffix = if self.max_suffix_digits == 0 {
            None
        } else {
            let sep = if self.allow_separator { "[_-]?" } else { "" };
            let pattern = format!(
                r"^(?P<head>.*?){sep}(?P<digits>\d{{1,{}}})$",
                self.max_suffix_digits
            );
            Some(Regex::new(&pattern)?)
        };

        let mask = match alternation(&self.mask_markers) {
            Some(markers) => Some(Regex::new(&format!(
                r"(?i)^(?P<body>.+)[_-]{markers}\d*$"
            ))?),
            None => None,
        };

        let tail = match alternation(&self.protected_markers) {
            Some(markers) if self.layer_before_marker && suffix.is_some() => Some(Regex::new(
                &format!(r"(?i)^(?P<body>.+?)(?P<tail>[_-]{markers}\d+)$"),
            )?),
            _ => None,
        };

        Ok(VariantMatcher {
            suffix,
            mask,
            tail,
            markers: self
                .protected_markers
                .iter()
                .map(|m| m.to_ascii_lowercase())
                .collect(),
            case_insensitive: self.case_insensitive,
        })
    }
}

/// A compiled [`VariantRule`].
#[derive(Debug, Clone)]
pub struct VariantMatcher {
    suffix: Option<Regex>,
    mask: Option<Regex>,
    tail: Option<Regex>,
    markers: Vec<String>,
    case_insensitive: bool,
}

/// Family name, optional variant number and mask flag for one stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemParts {
    pub family: String,
    pub variant: Option<u32>,
    pub mask: bool,
}

impl VariantMatcher {
    /// Splits a file stem (no extension) into family name and variant number.
    pub fn split(&self, stem: &str) -> StemParts {
        let (core, mask) = match self.mask.as_ref().and_then(|re| re.captures(stem)) {
            Some(caps) => match caps.name("body") {
                Some(body) => (body.as_str(), true),
                None => (stem, false),
            },
            None => (stem, false),
        };

        let (body, tail) = match self.tail.as_ref().and_then(|re| re.captures(core)) {
            Some(caps) => match (caps.name("body"), caps.name("tail")) {
                (Some(body), Some(tail)) => (body.as_str(), tail.as_str()),
                _ => (core, ""),
            },
            None => (core, ""),
        };

        let (family, variant) = self.split_suffix(body);
        StemParts {
            family: format!("{family}{tail}"),
            variant,
            mask,
        }
    }

    fn split_suffix<'a>(&self, stem: &'a str) -> (&'a str, Option<u32>) {
        let Some(re) = &self.suffix else {
            return (stem, None);
        };
        let Some(caps) = re.captures(stem) else {
            return (stem, None);
        };
        let (Some(head), Some(digits)) = (caps.name("head"), caps.name("digits")) else {
            return (stem, None);
        };

        let head = head.as_str();
        if !head.chars().last().is_some_and(char::is_alphabetic) || self.is_protected(head) {
            return (stem, None);
        }

        match digits.as_str().parse::<u32>() {
            Ok(n) => (head, Some(n)),
            Err(_) => (stem, None),
        }
    }

    fn is_protected(&self, head: &str) -> bool {
        let start = head
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_alphabetic())
            .last()
            .map(|(i, _)| i)
            .unwrap_or(head.len());
        let token = head[start..].to_ascii_lowercase();
        self.markers.iter().any(|m| *m == token)
    }

    /// Key used to merge and order families.
    pub fn key(&self, family: &str) -> String {
        if self.case_insensitive {
            family.to_ascii_lowercase()
        } else {
            family.to_string()
        }
    }
}

/// A set of file names that are variants of the same part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    /// Family name as spelled by its first member.
    pub name: String,
    /// Ordering key from [`VariantMatcher::key`].
    pub key: String,
    /// Member file names: main sheets by variant number then name, then masks.
    pub members: Vec<String>,
    /// How many trailing members are mask sheets.
    pub mask_count: usize,
}

/// Partitions file names into variant families.
///
/// Every input name lands in exactly one family. The result does not depend
/// on input order.
pub fn group_file_names<S: AsRef<str>>(names: &[S], matcher: &VariantMatcher) -> Vec<Family> {
    let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.dedup();

    type Members<'n> = Vec<(bool, Option<u32>, &'n str)>;
    let mut families: BTreeMap<String, (String, Members<'_>)> = BTreeMap::new();
    for name in sorted {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        let parts = matcher.split(stem);
        families
            .entry(matcher.key(&parts.family))
            .or_insert_with(|| (parts.family.clone(), Vec::new()))
            .1
            .push((parts.mask, parts.variant, name));
    }

    families
        .into_iter()
        .map(|(key, (name, mut members))| {
            members.sort();
            Family {
                name,
                key,
                mask_count: members.iter().filter(|(mask, _, _)| *mask).count(),
                members: members.into_iter().map(|(_, _, n)| n.to_string()).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_matcher() -> VariantMatcher {
        VariantRule::default().compile().unwrap()
    }

    fn members(families: &[Family]) -> Vec<Vec<&str>> {
        families
            .iter()
            .map(|f| f.members.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn numbered_clothing_groups_and_hair_stands_alone() {
        let names = ["clothing1.png", "clothing2.png", "hair.png"];
        let families = group_file_names(&names, &default_matcher());

        assert_eq!(families.len(), 2);
        assert_eq!(families[0].name, "clothing");
        assert_eq!(
            members(&families),
            vec![vec!["clothing1.png", "clothing2.png"], vec!["hair.png"]]
        );
    }

    #[test]
    fn unsuffixed_base_joins_its_numbered_variants() {
        let names = ["Cloak2.png", "Cloak.png", "Cloak1.png"];
        let families = group_file_names(&names, &default_matcher());
        assert_eq!(
            members(&families),
            vec![vec!["Cloak.png", "Cloak1.png", "Cloak2.png"]]
        );
    }

    #[test]
    fn variants_sort_numerically() {
        let names = ["wing10.png", "wing2.png", "wing1.png"];
        let families = group_file_names(&names, &default_matcher());
        assert_eq!(
            members(&families),
            vec![vec!["wing1.png", "wing2.png", "wing10.png"]]
        );
    }

    #[test]
    fn part_numbers_after_marker_are_distinct_parts() {
        let names = ["SV_AccA_p01.png", "SV_AccA_p02.png"];
        let families = group_file_names(&names, &default_matcher());
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].name, "SV_AccA_p01");
    }

    #[test]
    fn separator_is_optional_part_of_suffix() {
        let names = ["mouth_1.png", "mouth-2.png", "mouth3.png"];
        let families = group_file_names(&names, &default_matcher());
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].name, "mouth");

        let strict = VariantRule {
            allow_separator: false,
            ..VariantRule::default()
        }
        .compile()
        .unwrap();
        assert_eq!(group_file_names(&names, &strict).len(), 3);
    }

    #[test]
    fn long_digit_runs_are_names_not_variants() {
        let names = ["sheet123.png", "sheet124.png"];
        let families = group_file_names(&names, &default_matcher());
        assert_eq!(families.len(), 2);
    }

    #[test]
    fn zero_digits_disables_grouping() {
        let rule = VariantRule {
            max_suffix_digits: 0,
            ..VariantRule::default()
        };
        let names = ["clothing1.png", "clothing2.png"];
        assert_eq!(group_file_names(&names, &rule.compile().unwrap()).len(), 2);
    }

    #[test]
    fn case_sensitivity_is_configurable() {
        let names = ["Hair1.png", "hair2.png"];
        assert_eq!(group_file_names(&names, &default_matcher()).len(), 1);

        let sensitive = VariantRule {
            case_insensitive: false,
            ..VariantRule::default()
        }
        .compile()
        .unwrap();
        assert_eq!(group_file_names(&names, &sensitive).len(), 2);
    }

    #[test]
    fn grouping_is_independent_of_input_order() {
        let a = ["b2.png", "a1.png", "b1.png", "c.png", "a2.png"];
        let b = ["c.png", "a2.png", "b1.png", "a1.png", "b2.png"];
        let matcher = default_matcher();
        assert_eq!(group_file_names(&a, &matcher), group_file_names(&b, &matcher));
    }

    #[test]
    fn every_name_lands_in_exactly_one_family() {
        let names = [
            "Face_p01.png",
            "Face_p01_c.png",
            "Face_p01_c1.png",
            "Clothing1.png",
            "Clothing2.png",
            "9.png",
            "x.png",
        ];
        let families = group_file_names(&names, &default_matcher());
        let mut all: Vec<&str> = families
            .iter()
            .flat_map(|f| f.members.iter().map(String::as_str))
            .collect();
        all.sort_unstable();
        let mut expected = names.to_vec();
        expected.sort_unstable();
        assert_eq!(all, expected);
    }

    #[test]
    fn split_reports_variant_number() {
        let matcher = default_matcher();
        assert_eq!(
            matcher.split("Clothing2"),
            StemParts {
                family: "Clothing".to_string(),
                variant: Some(2),
                mask: false,
            }
        );
        assert_eq!(matcher.split("7").variant, None);
        assert_eq!(matcher.split("p3").variant, None);
    }

    #[test]
    fn mask_sheets_join_their_main_sheet() {
        let names = [
            "SV_AccA_p01.png",
            "SV_AccA_p01_c.png",
            "SV_Clothing1_p01.png",
            "SV_Clothing2_p01.png",
        ];
        let families = group_file_names(&names, &default_matcher());

        assert_eq!(families.len(), 2);
        assert_eq!(families[0].name, "SV_AccA_p01");
        assert_eq!(
            families[0].members,
            vec!["SV_AccA_p01.png", "SV_AccA_p01_c.png"]
        );
        assert_eq!(families[0].mask_count, 1);
        assert_eq!(families[1].name, "SV_Clothing_p01");
        assert_eq!(
            families[1].members,
            vec!["SV_Clothing1_p01.png", "SV_Clothing2_p01.png"]
        );
        assert_eq!(families[1].mask_count, 0);
    }

    #[test]
    fn numbered_and_dashed_masks_are_recognised() {
        let matcher = default_matcher();
        for stem in ["Face_p01_c", "Face_p01_c1", "Face_p01-C2"] {
            let parts = matcher.split(stem);
            assert!(parts.mask, "{stem}");
            assert_eq!(parts.family, "Face_p01", "{stem}");
        }
        assert!(!matcher.split("Face_p01").mask);
        assert!(!matcher.split("Cloak").mask);
    }

    #[test]
    fn masks_are_listed_after_main_sheets() {
        let names = ["TV_Clothing2_p03_c.png", "TV_Clothing1_p03.png", "TV_Clothing2_p03.png"];
        let families = group_file_names(&names, &default_matcher());
        assert_eq!(
            members(&families),
            vec![vec![
                "TV_Clothing1_p03.png",
                "TV_Clothing2_p03.png",
                "TV_Clothing2_p03_c.png"
            ]]
        );
        assert_eq!(families[0].mask_count, 1);
    }

    #[test]
    fn mask_only_family_counts_every_member_as_mask() {
        let names = ["SV_Tail_p02_c.png"];
        let families = group_file_names(&names, &default_matcher());
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].name, "SV_Tail_p02");
        assert_eq!(families[0].mask_count, 1);
    }

    #[test]
    fn layer_digit_and_mask_rules_can_be_disabled() {
        let names = ["SV_Clothing1_p01.png", "SV_Clothing2_p01.png", "SV_Clothing1_p01_c.png"];
        let rule = VariantRule {
            layer_before_marker: false,
            mask_markers: Vec::new(),
            ..VariantRule::default()
        };
        assert_eq!(group_file_names(&names, &rule.compile().unwrap()).len(), 3);
    }

    #[test]
    fn family_key_follows_case_rule() {
        let names = ["beard.png", "Hair.png", "zz.png"];
        let families = group_file_names(&names, &default_matcher());
        let keys: Vec<&str> = families.iter().map(|f| f.key.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert_eq!(families[1].key, "hair");
    }
}
