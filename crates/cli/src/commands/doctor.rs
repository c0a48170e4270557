use rentwise_core::config::AppConfig;
use rentwise_core::{
    DeterministicValuationEngine, PriceBands, ReferenceDataset, RoomFeatures, RoomType,
    ValuationRuntime,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::LoadedConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(loaded: &LoadedConfig, json_output: bool) -> (bool, String) {
    let report = build_report(loaded);
    let healthy = report.overall_status == CheckStatus::Pass;

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return (healthy, output);
    }

    (healthy, render_human(&report))
}

fn build_report(loaded: &LoadedConfig) -> DoctorReport {
    let mut checks = Vec::new();

    match &loaded.config {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match config.reference_dataset() {
                Ok(dataset) => {
                    checks.push(check_reference_data(config, &dataset));
                    checks.push(check_valuation_smoke(config, dataset));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "reference_data",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped("valuation_smoke", "reference data did not load"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("reference_data", "configuration did not load"));
            checks.push(skipped("valuation_smoke", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: format!("skipped because {reason}"),
    }
}

fn check_reference_data(config: &AppConfig, dataset: &ReferenceDataset) -> DoctorCheck {
    let source = config
        .market
        .reference_data
        .as_ref()
        .map(|path| format!("`{}`", path.display()))
        .unwrap_or_else(|| "builtin catalogue".to_string());

    if dataset.is_empty() {
        return DoctorCheck {
            name: "reference_data",
            status: CheckStatus::Fail,
            details: format!("{source} has no listings; every valuation would use the default average"),
        };
    }

    DoctorCheck {
        name: "reference_data",
        status: CheckStatus::Pass,
        details: format!("{} listings loaded from {source}", dataset.len()),
    }
}

fn check_valuation_smoke(config: &AppConfig, dataset: ReferenceDataset) -> DoctorCheck {
    let engine = DeterministicValuationEngine::new(
        config.weights(),
        config.market_policy(),
        PriceBands::default(),
        dataset,
    );
    let sample = RoomFeatures {
        location: "university".to_string(),
        size: Decimal::from(18),
        room_type: RoomType::Private,
        furnished: true,
        has_wifi: true,
        has_parking: false,
        has_kitchen: true,
        has_laundry: false,
        has_balcony: false,
        pets_allowed: false,
        distance_to_university: Decimal::new(5, 1),
        floor: 1,
    };

    match engine.predict_price(&sample) {
        Ok(prediction) => DoctorCheck {
            name: "valuation_smoke",
            status: CheckStatus::Pass,
            details: format!(
                "sample room valued at {} ({} market, {}% confidence)",
                prediction.predicted_price, prediction.market_comparison, prediction.confidence
            ),
        },
        Err(error) => DoctorCheck {
            name: "valuation_smoke",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
