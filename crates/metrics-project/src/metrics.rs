//! Function-point arithmetic: weighted counts, value adjustment, code size.
//!
//! Uses the common IFPUG weight table and the standard adjustment formula
//! `FP = UFP * (0.65 + 0.01 * VAF)`, where UFP is the sum of weighted counts
//! and VAF the sum of the 14 general-system-characteristic ratings.

use std::fmt;

use crate::mapping::FunctionPointState;

/// Number of function-point categories.
pub const FP_CATEGORY_COUNT: usize = 5;

/// Number of general system characteristics rated for the VAF.
pub const GSC_COUNT: usize = 14;

/// Highest rating a general system characteristic can take.
pub const MAX_GSC_RATING: i32 = 5;

/// General system characteristics, in storage order.
pub const GENERAL_SYSTEM_CHARACTERISTICS: [&str; GSC_COUNT] = [
    "Data communications",
    "Distributed data processing",
    "Performance",
    "Heavily used configuration",
    "Transaction rate",
    "Online data entry",
    "End-user efficiency",
    "Online update",
    "Complex processing",
    "Reusability",
    "Installation ease",
    "Operational ease",
    "Multiple sites",
    "Facilitate change",
];

/// Languages with a known lines-of-code-per-FP rate.
pub const SUPPORTED_LANGUAGES: [&str; 6] = ["Java", "C++", "C#", "Python", "Ruby", "Objective-C"];

/// Rate used for languages missing from the table.
pub const DEFAULT_LOC_PER_FP: f64 = 50.0;

/// Function-point categories, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpCategory {
    ExternalInputs,
    ExternalOutputs,
    ExternalInquiries,
    InternalLogicalFiles,
    ExternalInterfaceFiles,
}

impl FpCategory {
    pub const ALL: [FpCategory; FP_CATEGORY_COUNT] = [
        FpCategory::ExternalInputs,
        FpCategory::ExternalOutputs,
        FpCategory::ExternalInquiries,
        FpCategory::InternalLogicalFiles,
        FpCategory::ExternalInterfaceFiles,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FpCategory::ExternalInputs => "External Inputs",
            FpCategory::ExternalOutputs => "External Outputs",
            FpCategory::ExternalInquiries => "External Inquiries",
            FpCategory::InternalLogicalFiles => "Internal Logical Files",
            FpCategory::ExternalInterfaceFiles => "External Interface Files",
        }
    }

    /// Weight for this category at the given complexity.
    pub fn weight(self, complexity: Complexity) -> i32 {
        let [simple, average, complex] = match self {
            FpCategory::ExternalInputs => [3, 4, 6],
            FpCategory::ExternalOutputs => [4, 5, 7],
            FpCategory::ExternalInquiries => [3, 4, 6],
            FpCategory::InternalLogicalFiles => [7, 10, 15],
            FpCategory::ExternalInterfaceFiles => [5, 7, 10],
        };
        match complexity {
            Complexity::Simple => simple,
            Complexity::Average => average,
            Complexity::Complex => complex,
        }
    }
}

impl fmt::Display for FpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complexity rating of a category; stored as its index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Complexity {
    Simple,
    #[default]
    Average,
    Complex,
}

impl Complexity {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Complexity::Simple),
            1 => Some(Complexity::Average),
            2 => Some(Complexity::Complex),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Complexity::Simple => 0,
            Complexity::Average => 1,
            Complexity::Complex => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Complexity::Simple => "Simple",
            Complexity::Average => "Average",
            Complexity::Complex => "Complex",
        }
    }
}

/// Weighted count for one category. Negative counts count as zero.
pub fn weighted_count(category: FpCategory, count: i32, complexity: Complexity) -> i32 {
    count.max(0).saturating_mul(category.weight(complexity))
}

/// Unadjusted function points (UFP). Unknown complexity indices count as average.
pub fn unadjusted_total(
    counts: &[i32; FP_CATEGORY_COUNT],
    complexities: &[i32; FP_CATEGORY_COUNT],
) -> i32 {
    FpCategory::ALL
        .iter()
        .zip(counts.iter().zip(complexities))
        .map(|(&category, (&count, &cx))| {
            let complexity = Complexity::from_index(cx).unwrap_or_default();
            weighted_count(category, count, complexity)
        })
        .fold(0i32, i32::saturating_add)
}

/// Sum of the GSC ratings, each clamped into `0..=5`.
pub fn vaf_sum(values: &[i32; GSC_COUNT]) -> i32 {
    values.iter().map(|&v| v.clamp(0, MAX_GSC_RATING)).sum()
}

/// Adjusted function points: `ufp * (0.65 + 0.01 * vaf_sum)`.
pub fn adjusted_function_points(ufp: i32, vaf_sum: i32) -> f64 {
    f64::from(ufp) * (0.65 + 0.01 * f64::from(vaf_sum))
}

/// Format with the `#,##0.0` pattern: grouped thousands, one decimal place.
pub fn format_function_points(fp: f64) -> String {
    format_grouped(fp, 1)
}

/// Lines of code per function point for `language`.
pub fn loc_per_function_point(language: &str) -> f64 {
    match language {
        "Java" => 53.0,
        "C++" => 55.0,
        "C#" => 58.0,
        "Python" | "Ruby" => 21.0,
        "Objective-C" => 30.0,
        _ => DEFAULT_LOC_PER_FP,
    }
}

/// Estimated code size for a function-point total in a given language.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeSizeEstimate {
    pub loc: f64,
    pub loc_per_fp: f64,
}

impl fmt::Display for CodeSizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} LOC ({:.0} LOC/FP)",
            format_grouped(self.loc, 0),
            self.loc_per_fp
        )
    }
}

/// The language name if one is actually selected: not absent, not blank,
/// and not the placeholder `"None"` that older worksheets store.
pub fn selected_language(language: Option<&str>) -> Option<&str> {
    language.map(str::trim).filter(|l| !l.is_empty() && *l != "None")
}

/// `None` when no language is selected (see [`selected_language`]).
pub fn estimate_code_size(fp: f64, language: Option<&str>) -> Option<CodeSizeEstimate> {
    let language = selected_language(language)?;
    let loc_per_fp = loc_per_function_point(language);
    Some(CodeSizeEstimate {
        loc: fp * loc_per_fp,
        loc_per_fp,
    })
}

impl FunctionPointState {
    /// Build a state with every derived field computed from the inputs.
    pub fn compute(
        language: Option<String>,
        counts: [i32; FP_CATEGORY_COUNT],
        complexities: [i32; FP_CATEGORY_COUNT],
        vaf_values: [i32; GSC_COUNT],
    ) -> Self {
        let mut state = FunctionPointState {
            language,
            counts,
            complexities,
            vaf_values,
            ..FunctionPointState::default()
        };
        state.recompute();
        state
    }

    /// Refresh `total_weighted`, `vaf_sum` and `fp_formatted` from the inputs.
    pub fn recompute(&mut self) {
        self.total_weighted = unadjusted_total(&self.counts, &self.complexities);
        self.vaf_sum = vaf_sum(&self.vaf_values);
        self.fp_formatted = format_function_points(self.function_points());
    }

    /// Adjusted function points from the stored totals.
    pub fn function_points(&self) -> f64 {
        adjusted_function_points(self.total_weighted, self.vaf_sum)
    }

    /// Function points as displayed, rounded to one decimal like `fp_formatted`.
    pub fn rounded_function_points(&self) -> f64 {
        round_function_points(self.function_points())
    }

    /// Code size from the displayed function points. The worksheet language
    /// applies unless it is unset or `"None"`; then `fallback` is used.
    pub fn code_size(&self, fallback: Option<&str>) -> Option<CodeSizeEstimate> {
        let language =
            selected_language(self.language.as_deref()).or_else(|| selected_language(fallback));
        estimate_code_size(self.rounded_function_points(), language)
    }
}

/// `fp` rounded to the one decimal place [`format_function_points`] shows.
pub fn round_function_points(fp: f64) -> f64 {
    if !fp.is_finite() {
        return fp;
    }
    round_half_even(fp.abs(), 1)
        .parse::<f64>()
        .map_or(fp, |r| r.copysign(fp))
}

/// Round half-to-even at `decimals` places, then group the integer part by
/// thousands. Ties are decided on the exact binary value, as `DecimalFormat`
/// does: the double nearest 0.65 lies above 0.65 and rounds to "0.7".
fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = round_half_even(value.abs(), decimals);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if value < 0.0 && digits.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Fixed-point digits of a finite, non-negative `value`.
///
/// `{:.N}` already rounds the exact binary value correctly, so only exact
/// ties need handling: values whose expansion ends in a 5 one place past
/// `decimals`.
fn round_half_even(value: f64, decimals: usize) -> String {
    let tie_place = decimals + 1;
    if has_at_most_decimals(value, tie_place) {
        let exact = format!("{:.*}", tie_place, value);
        if let Some(kept) = exact.strip_suffix('5') {
            let kept = kept.strip_suffix('.').unwrap_or(kept);
            let odd = kept.bytes().last().is_some_and(|b| (b - b'0') % 2 == 1);
            return if odd {
                increment_last_digit(kept)
            } else {
                kept.to_string()
            };
        }
    }
    format!("{:.*}", decimals, value)
}

/// Whether `value * 10^places` is an integer, from the bits of the double.
/// With `value = m * 2^e`, that holds when `trailing_zeros(m) + e + places >= 0`.
fn has_at_most_decimals(value: f64, places: usize) -> bool {
    if value == 0.0 {
        return true;
    }
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    i64::from(mantissa.trailing_zeros()) + exponent + places as i64 >= 0
}

/// Add one unit in the last place of a decimal digit string, carrying left.
fn increment_last_digit(digits: &str) -> String {
    let mut chars: Vec<char> = digits.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            '.' => {}
            '9' => *c = '0',
            d => {
                *c = char::from(d as u8 + 1);
                return chars.into_iter().collect();
            }
        }
    }
    std::iter::once('1').chain(chars).collect()
}
