// Writing the group summaries as a tab-separated table.

use robust_rank::GroupSummary;

pub const OUTPUT_HEADER: &str = "group_id\t#_items_in_group\tlo_value\tFDR";

/// Formats like the `%10.4e` conversion of printf: 4 fraction digits, an
/// exponent with a sign and at least 2 digits, right-aligned on 10 characters.
pub fn format_scientific(x: f64) -> String {
    if !x.is_finite() {
        return format!("{:>10}", x);
    }
    let s = format!("{:.4e}", x);
    let (mantissa, exponent) = match s.split_once('e') {
        Some(p) => p,
        None => return format!("{:>10}", s),
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exponent),
    };
    format!("{:>10}", format!("{}e{}{:0>2}", mantissa, sign, digits))
}

pub fn render_summaries(summaries: &[GroupSummary]) -> String {
    let mut out = String::new();
    out.push_str(OUTPUT_HEADER);
    out.push('\n');
    for s in summaries {
        out.push_str(&format!(
            "{}\t{}\t{}\t{:.6}\n",
            s.name,
            s.item_count,
            format_scientific(s.lo_value),
            s.fdr
        ));
    }
    out
}
