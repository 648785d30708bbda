use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about, long_about = None)]
pub struct SweepCli {
    /// Measure a single snake count instead of the sweep the scenario is configured with.
    ///
    /// Accepts a positive integer, for example `1000` to measure 1000 snakes only. When omitted,
    /// every configured snake count is measured.
    #[clap(value_parser = parse_snake_count)]
    pub snake_count: Option<u32>,

    /// The number of measurement runs per snake count
    #[clap(long, value_parser = parse_runs)]
    pub runs: Option<usize>,

    /// Write the JSON summary to this path instead of the scenario's default
    #[clap(long)]
    pub summary_path: Option<PathBuf>,
}

fn parse_snake_count(s: &str) -> anyhow::Result<u32> {
    let snake_count = s
        .parse::<u32>()
        .map_err(|_| anyhow::anyhow!("'{s}' is not a valid number"))?;

    if snake_count == 0 {
        anyhow::bail!("The snake count must be greater than zero");
    }

    Ok(snake_count)
}

fn parse_runs(s: &str) -> anyhow::Result<usize> {
    let runs = s
        .parse::<usize>()
        .map_err(|_| anyhow::anyhow!("'{s}' is not a valid number"))?;

    if runs == 0 {
        anyhow::bail!("At least one run per snake count is required");
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_single_snake_count() {
        let cli = SweepCli::try_parse_from(["scenario", "250"]).unwrap();
        assert_eq!(cli.snake_count, Some(250));
        assert_eq!(cli.runs, None);
        assert_eq!(cli.summary_path, None);
    }

    #[test]
    fn accepts_overrides() {
        let cli = SweepCli::try_parse_from([
            "scenario",
            "--runs",
            "7",
            "--summary-path",
            "out/summary.json",
        ])
        .unwrap();
        assert_eq!(cli.snake_count, None);
        assert_eq!(cli.runs, Some(7));
        assert_eq!(cli.summary_path, Some(PathBuf::from("out/summary.json")));
    }

    #[test]
    fn rejects_a_non_numeric_snake_count() {
        assert!(SweepCli::try_parse_from(["scenario", "abc"]).is_err());
    }

    #[test]
    fn rejects_a_zero_snake_count() {
        assert!(SweepCli::try_parse_from(["scenario", "0"]).is_err());
    }

    #[test]
    fn rejects_zero_runs() {
        assert!(SweepCli::try_parse_from(["scenario", "--runs", "0"]).is_err());
    }
}
