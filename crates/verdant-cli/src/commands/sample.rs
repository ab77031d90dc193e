use std::path::Path;

use verdant_core::{METRICS, Metric, SampleOrigin, SampleSource, Sampler};

pub fn run(endpoint: Option<String>, mock: bool, json: bool, rules_path: Option<&Path>) {
    let rules = super::load_rules(rules_path);
    let config = super::build_config(endpoint, mock, 5000);

    let sampler = Sampler::new();
    let sample = sampler.fetch_one(&config);
    let advisory = rules.evaluate(&sample.reading);

    if json {
        let out = serde_json::json!({
            "sample": sample,
            "advisory": advisory,
        });
        println!("{}", serde_json::to_string_pretty(&out).unwrap());
        return;
    }

    println!("🌱 Verdant v{}", verdant_core::VERSION);
    println!("   source: {}", describe_origin(&sample.origin));
    println!();
    for metric in METRICS {
        println!(
            "   {:<14} {}",
            metric.label(),
            format_value(sample.reading.metric(metric), metric),
        );
    }
    println!();
    println!("   {}", advisory.headline);
    for tip in advisory.tips.iter().skip(1) {
        println!("   • {tip}");
    }
}

fn describe_origin(origin: &SampleOrigin) -> String {
    match origin {
        SampleOrigin::Live => "live sensor".to_string(),
        SampleOrigin::Mock => "mock generator".to_string(),
        SampleOrigin::Fallback(reason) => {
            format!("mock generator (fallback: {})", reason.describe())
        }
    }
}

/// "21.5 °C", "820 lx", or "--" for an unknown value.
pub fn format_value(value: Option<f64>, metric: Metric) -> String {
    match value {
        None => "--".to_string(),
        Some(v) => match metric {
            Metric::Temperature | Metric::Humidity => format!("{v:.1} {}", metric.unit()),
            Metric::Soil | Metric::Light => format!("{v:.0} {}", metric.unit()),
        },
    }
}
