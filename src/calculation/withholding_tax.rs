//! Withholding tax calculation.
//!
//! Progressive monthly withholding tax over a bracket schedule. The
//! explanation text and bracket table are rendered from the same
//! [`TaxSchedule`] used for the arithmetic, so displayed boundaries always
//! match the applied ones.
//!
//! ## Default schedule
//!
//! | Taxable income | Tax |
//! |---|---|
//! | ≤ 20,832 | 0 |
//! | 20,833 – 33,332 | (income − 20,833) × 20% |
//! | 33,333 – 66,666 | 2,500 + (income − 33,333) × 25% |
//! | 66,667 – 166,666 | 10,833 + (income − 66,667) × 30% |
//! | 166,667 – 666,666 | 40,833.33 + (income − 166,667) × 32% |
//! | ≥ 666,667 | 200,833.33 + (income − 666,667) × 35% |

use rust_decimal::Decimal;

use crate::config::{TaxBracket, TaxSchedule};

/// Returns the bracket that applies to a taxable income, or `None` when the
/// income is at or below the exempt ceiling.
///
/// Incomes between the exempt ceiling and the first bracket's lower bound
/// fall into the first bracket.
pub fn applicable_bracket(taxable_income: Decimal, schedule: &TaxSchedule) -> Option<&TaxBracket> {
    if taxable_income <= schedule.exempt_ceiling {
        return None;
    }

    schedule
        .brackets
        .iter()
        .rfind(|bracket| bracket.lower_bound <= taxable_income)
        .or_else(|| schedule.brackets.first())
}

/// Computes monthly withholding tax.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::withholding_tax;
/// use payroll_engine::config::TaxSchedule;
/// use rust_decimal::Decimal;
///
/// let schedule = TaxSchedule::default();
/// assert_eq!(withholding_tax(Decimal::from(20832), &schedule), Decimal::ZERO);
/// // the first bracket taxes only the excess over its lower bound
/// assert_eq!(withholding_tax(Decimal::from(20833), &schedule), Decimal::ZERO);
/// assert_eq!(withholding_tax(Decimal::from(20834), &schedule), Decimal::new(20, 2));
/// assert_eq!(withholding_tax(Decimal::from(666667), &schedule), Decimal::new(20083333, 2));
/// ```
pub fn withholding_tax(taxable_income: Decimal, schedule: &TaxSchedule) -> Decimal {
    match applicable_bracket(taxable_income, schedule) {
        Some(bracket) => {
            let excess = (taxable_income - bracket.lower_bound).max(Decimal::ZERO);
            bracket.base_tax + excess * bracket.rate
        }
        None => Decimal::ZERO,
    }
}

/// Explains, in one sentence, which bracket applies and how the tax is formed.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::tax_bracket_explanation;
/// use payroll_engine::config::TaxSchedule;
/// use rust_decimal::Decimal;
///
/// let text = tax_bracket_explanation(Decimal::from(25000), &TaxSchedule::default());
/// assert_eq!(
///     text,
///     "Taxable income of 25,000.00 falls in the 20,833 to 33,332 bracket: \
///      (income - 20,833) x 20% = 833.40"
/// );
/// ```
pub fn tax_bracket_explanation(taxable_income: Decimal, schedule: &TaxSchedule) -> String {
    let income = format_money(taxable_income);

    let Some(bracket) = applicable_bracket(taxable_income, schedule) else {
        return format!(
            "Taxable income of {} is at or below {}: no withholding tax",
            income,
            format_boundary(schedule.exempt_ceiling)
        );
    };

    format!(
        "Taxable income of {} falls in the {} bracket: {} = {}",
        income,
        bracket_range(bracket, schedule),
        bracket_formula(bracket),
        format_money(withholding_tax(taxable_income, schedule))
    )
}

/// Renders the whole schedule, one line per bracket, lowest first.
///
/// ```
/// use payroll_engine::calculation::tax_bracket_table;
/// use payroll_engine::config::TaxSchedule;
///
/// let lines = tax_bracket_table(&TaxSchedule::default());
/// assert_eq!(lines[0], "0 to 20,832: no withholding tax");
/// assert_eq!(lines[1], "20,833 to 33,332: (income - 20,833) x 20%");
/// assert_eq!(lines[5], "666,667 and above: 200,833.33 + (income - 666,667) x 35%");
/// ```
pub fn tax_bracket_table(schedule: &TaxSchedule) -> Vec<String> {
    let mut lines = Vec::with_capacity(schedule.brackets.len() + 1);
    lines.push(format!(
        "0 to {}: no withholding tax",
        format_boundary(schedule.exempt_ceiling)
    ));
    lines.extend(schedule.brackets.iter().map(|bracket| {
        format!(
            "{}: {}",
            bracket_range(bracket, schedule),
            bracket_formula(bracket)
        )
    }));
    lines
}

fn bracket_range(bracket: &TaxBracket, schedule: &TaxSchedule) -> String {
    let next = schedule
        .brackets
        .iter()
        .find(|b| b.lower_bound > bracket.lower_bound);

    match next {
        Some(next) => format!(
            "{} to {}",
            format_boundary(bracket.lower_bound),
            format_boundary(next.lower_bound - Decimal::ONE)
        ),
        None => format!("{} and above", format_boundary(bracket.lower_bound)),
    }
}

fn bracket_formula(bracket: &TaxBracket) -> String {
    let percent = (bracket.rate * Decimal::ONE_HUNDRED).normalize();
    let marginal = format!(
        "(income - {}) x {}%",
        format_boundary(bracket.lower_bound),
        percent
    );

    if bracket.base_tax.is_zero() {
        marginal
    } else {
        format!("{} + {}", format_boundary(bracket.base_tax), marginal)
    }
}

/// Table boundaries: no trailing zeros.
fn format_boundary(value: Decimal) -> String {
    group_thousands(&value.normalize().to_string())
}

/// Money: always two decimals.
fn format_money(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    group_thousands(&rounded.to_string())
}

fn group_thousands(text: &str) -> String {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}
