//! Turns raw run totals into per-success costs and renders them for the console.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::simulation::monte_carlo::SimulationResult;
use crate::simulation::strategy::Gate;

/// Exp granted by one premium tube.
pub const EXP_PER_TUBE: f64 = 5000.0;
/// Premium tubes per unit of cost.
pub const TUBES_PER_COST_UNIT: f64 = 4.6;
/// Tuners per unit of cost.
pub const TUNERS_PER_COST_UNIT: f64 = 20.0;

const RULE: &str = "------------------------------------------------";

/// Expected spend for one kept echo, with abandoned attempts amortized in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub avg_exp: f64,
    pub premium_tubes: f64,
    pub tuners: f64,
    /// Fresh echoes consumed per kept echo.
    pub bases: f64,
    pub tuner_tube_ratio: f64,
    pub tube_cost: f64,
    pub tuner_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateDropoff {
    pub gate: Gate,
    pub aborted: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub iterations: u64,
    pub success_count: u64,
    pub success_ratio: f64,
    pub seed: u64,
    /// `None` when no trial was kept.
    pub costs: Option<CostBreakdown>,
    pub dropoff: Vec<GateDropoff>,
}

impl Report {
    pub fn from_result(result: &SimulationResult) -> Self {
        let success_ratio = if result.iterations == 0 {
            0.0
        } else {
            result.success_count as f64 / result.iterations as f64
        };

        let costs = (result.success_count > 0).then(|| {
            let successes = result.success_count as f64;
            let avg_exp = result.total_exp as f64 / successes;
            let tuners = result.total_tuners as f64 / successes;
            let premium_tubes = avg_exp / EXP_PER_TUBE;
            let tube_cost = premium_tubes / TUBES_PER_COST_UNIT;
            let tuner_cost = tuners / TUNERS_PER_COST_UNIT;
            CostBreakdown {
                avg_exp,
                premium_tubes,
                tuners,
                bases: 1.0 / success_ratio,
                tuner_tube_ratio: tuners / premium_tubes,
                tube_cost,
                tuner_cost,
                total_cost: tube_cost + tuner_cost,
            }
        });

        let dropoff = Gate::ALL
            .iter()
            .map(|&gate| GateDropoff {
                gate,
                aborted: result.aborted_at[gate.index()],
            })
            .collect();

        Self {
            iterations: result.iterations,
            success_count: result.success_count,
            success_ratio,
            seed: result.seed,
            costs,
            dropoff,
        }
    }

    pub fn render_text(&self, elapsed: Option<Duration>) -> String {
        let mut out = String::new();
        if let Some(elapsed) = elapsed {
            let _ = writeln!(out, "Finished in {:.2} seconds.", elapsed.as_secs_f64());
        }
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Valid={:.2}%:", self.success_ratio * 100.0);

        match &self.costs {
            Some(costs) => {
                let _ = writeln!(out, "| Exp    - {:.1} x Premium", costs.premium_tubes);
                let _ = writeln!(out, "| Tuners - {:.1}", costs.tuners);
                let _ = writeln!(out, "| Bases  - {}", with_thousands(costs.bases));
                let _ = writeln!(out, "Tuner/Tube Ratio: {:.2}", costs.tuner_tube_ratio);
                let _ = writeln!(
                    out,
                    "Cost: {:.1} + {:.1} = {:.1}",
                    costs.tube_cost, costs.tuner_cost, costs.total_cost
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "Warning: No valid Echoes were produced. Please check if the strategy or criteria are too strict."
                );
            }
        }

        for step in &self.dropoff {
            let share = if self.iterations == 0 {
                0.0
            } else {
                step.aborted as f64 / self.iterations as f64 * 100.0
            };
            let _ = writeln!(
                out,
                "Dropped at {:?} gate: {} ({share:.2}%)",
                step.gate, step.aborted
            );
        }
        let _ = writeln!(out, "{RULE}");
        out
    }
}

/// One decimal place with `,` between thousands groups, e.g. `12,345.6`.
fn with_thousands(value: f64) -> String {
    let fixed = format!("{value:.1}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "0"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::trial::ResourceTotals;

    fn result(success_count: u64, total_exp: u64, total_tuners: u64) -> SimulationResult {
        SimulationResult {
            iterations: 100,
            success_count,
            total_exp,
            total_tuners,
            seed: 0,
            kept: ResourceTotals::default(),
            abandoned: ResourceTotals::default(),
            aborted_at: [100 - success_count, 0, 0, 0],
        }
    }

    fn approx_eq(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn costs_are_per_success() {
        let report = Report::from_result(&result(4, 200_000, 400));
        approx_eq(report.success_ratio, 0.04);

        let costs = report.costs.expect("successes were recorded");
        approx_eq(costs.avg_exp, 50_000.0);
        approx_eq(costs.premium_tubes, 10.0);
        approx_eq(costs.tuners, 100.0);
        approx_eq(costs.bases, 25.0);
        approx_eq(costs.tuner_tube_ratio, 10.0);
        approx_eq(costs.tube_cost, 10.0 / 4.6);
        approx_eq(costs.tuner_cost, 5.0);
        approx_eq(costs.total_cost, 10.0 / 4.6 + 5.0);
    }

    #[test]
    fn zero_successes_are_flagged_instead_of_divided() {
        let report = Report::from_result(&result(0, 1_000, 70));
        assert!(report.costs.is_none());
        let text = report.render_text(None);
        assert!(text.contains("No valid Echoes were produced"));
        assert!(text.contains("Valid=0.00%"));
    }

    #[test]
    fn bases_are_grouped_by_thousands() {
        assert_eq!(with_thousands(7.24), "7.2");
        assert_eq!(with_thousands(999.96), "1,000.0");
        assert_eq!(with_thousands(1_234_567.89), "1,234,567.9");
        assert_eq!(with_thousands(-4321.0), "-4,321.0");

        let mut rare = result(0, 0, 0);
        rare.iterations = 1_000_000;
        rare.success_count = 400;
        rare.total_exp = 400 * 142_600;
        rare.total_tuners = 400 * 50;
        let text = Report::from_result(&rare).render_text(None);
        assert!(text.contains("| Bases  - 2,500.0"), "{text}");
    }

    #[test]
    fn text_lists_every_gate() {
        let text = Report::from_result(&result(10, 1_000_000, 500))
            .render_text(Some(Duration::from_millis(1500)));
        assert!(text.starts_with("Finished in 1.50 seconds."));
        assert!(text.contains("Valid=10.00%"));
        assert!(text.contains("Dropped at First gate: 90 (90.00%)"));
        assert!(text.contains("Dropped at Final gate: 0"));
    }
}
