use clap::{Args, ValueEnum};
use comfy_table::{Table, presets};
use krun::host::{self, Feature};
use krun::{Errno, KrunResult};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct FeaturesArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Answer to one capability query.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum Answer {
    Yes,
    No,
    /// libkrun doesn't know the query (older library).
    Unknown,
    Unsupported,
    Error(String),
}

impl Answer {
    fn from_bool(result: KrunResult<bool>) -> Self {
        match result {
            Ok(true) => Answer::Yes,
            Ok(false) => Answer::No,
            Err(e) if e == Errno::EINVAL => Answer::Unknown,
            Err(e) if e == Errno::ENOSYS || e == Errno::EOPNOTSUPP => Answer::Unsupported,
            Err(e) => Answer::Error(e.to_string()),
        }
    }

    fn label(&self) -> String {
        match self {
            Answer::Yes => "yes".into(),
            Answer::No => "no".into(),
            Answer::Unknown => "unknown (older libkrun?)".into(),
            Answer::Unsupported => "not supported".into(),
            Answer::Error(e) => format!("error: {e}"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeaturesReport {
    pub native_library: bool,
    pub virtualization: bool,
    pub virtualization_reason: String,
    pub max_vcpus: Option<u32>,
    pub nested_virt: Answer,
    pub features: Vec<(Feature, Answer)>,
}

impl FeaturesReport {
    pub fn collect() -> Self {
        let support = host::check_virtualization_support();
        let max_vcpus = match host::max_vcpus() {
            Ok(max) => Some(max),
            Err(e) => {
                tracing::debug!(error = %e, "max vCPU query failed");
                None
            }
        };
        Self {
            native_library: krun::native_available(),
            virtualization: support.available,
            virtualization_reason: support.reason,
            max_vcpus,
            nested_virt: Answer::from_bool(host::check_nested_virt()),
            features: Feature::ALL
                .iter()
                .map(|&f| (f, Answer::from_bool(host::has_feature(f))))
                .collect(),
        }
    }

    fn print_table(&self) {
        println!(
            "libkrun: {}",
            if self.native_library { "linked" } else { "not available (stub build)" }
        );
        println!("Virtualization: {}", self.virtualization_reason);
        match self.max_vcpus {
            Some(max) => println!("Max vCPUs: {max}"),
            None => println!("Max vCPUs: unknown"),
        }
        println!("Nested virtualization: {}", self.nested_virt.label());

        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        table.set_header(vec!["FEATURE", "SUPPORTED"]);
        for (feature, answer) in &self.features {
            table.add_row(vec![feature.name().to_string(), answer.label()]);
        }
        println!("\nCompile-time features:\n{table}");
    }
}

pub fn execute(args: FeaturesArgs) -> anyhow::Result<()> {
    let report = FeaturesReport::collect();
    match args.format {
        OutputFormat::Table => report.print_table(),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use krun::KrunError;

    #[test]
    fn test_answer_mapping() {
        assert_eq!(Answer::from_bool(Ok(true)), Answer::Yes);
        assert_eq!(Answer::from_bool(Ok(false)), Answer::No);
        let err = |errno| Err(KrunError::new("krun_has_feature", errno));
        assert_eq!(Answer::from_bool(err(Errno::EINVAL)), Answer::Unknown);
        assert_eq!(Answer::from_bool(err(Errno::ENOSYS)), Answer::Unsupported);
        assert!(matches!(Answer::from_bool(err(Errno::EIO)), Answer::Error(_)));
    }
}
