//! Interactive shell around the pipeline. The driver owns the only mutable
//! state of a session: the load cache, the last-known user inputs and the
//! budget range observed on the last run.

use crate::config::DashboardConfig;
use crate::loader::{LoadCache, load_csv};
use crate::models::{BudgetBounds, UserInputs};
use crate::pipeline;
use crate::report::Report;
use anyhow::{Context, Result, anyhow};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{info, warn};

const HELP: &str = "Commands:
  budget <amount>   set the maximum budget (steps of 5000 from the cheapest product)
  rating <value>    set the minimum rating (1.0 - 5.0, steps of 0.1)
  show              render the dashboard again
  help              show this message
  quit              leave the dashboard";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Budget(i64),
    Rating(f64),
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| anyhow!("Empty command"))?
            .to_lowercase();
        let argument = parts.next();

        match (verb.as_str(), argument) {
            ("budget", Some(value)) => {
                let amount = value
                    .replace(',', "")
                    .parse::<i64>()
                    .map_err(|_| anyhow!("Invalid budget value: {}", value))?;
                Ok(Command::Budget(amount))
            }
            ("rating", Some(value)) => {
                let rating = value
                    .parse::<f64>()
                    .map_err(|_| anyhow!("Invalid rating value: {}", value))?;
                Ok(Command::Rating(rating))
            }
            ("budget", None) | ("rating", None) => Err(anyhow!("'{}' needs a value", verb)),
            ("show", _) => Ok(Command::Show),
            ("help", _) | ("?", _) => Ok(Command::Help),
            ("quit", _) | ("exit", _) | ("q", _) => Ok(Command::Quit),
            (other, _) => Err(anyhow!("Unknown command: {}", other)),
        }
    }
}

pub struct Dashboard {
    config: DashboardConfig,
    cache: LoadCache,
    inputs: UserInputs,
    bounds: Option<BudgetBounds>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, cache: LoadCache) -> Self {
        let inputs = config.initial_inputs();
        Self {
            config,
            cache,
            inputs,
            bounds: None,
        }
    }

    pub fn inputs(&self) -> UserInputs {
        self.inputs
    }

    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }

    /// Run the pipeline for the current inputs. The inputs are replaced by
    /// their clamped form so the session state never leaves the valid range.
    pub fn refresh(&mut self) -> Result<Report> {
        let raw = self
            .cache
            .get_or_load(&self.config.data_path, load_csv)
            .with_context(|| format!("Failed to load dataset {}", self.config.data_path.display()))?;

        let outputs = pipeline::run(&raw, &self.inputs, &self.config.pipeline_options())
            .context("Dashboard computation failed")?;

        if outputs.inputs != self.inputs {
            info!(
                "Inputs adjusted to allowed range: budget {} -> {}, rating {:.1} -> {:.1}",
                self.inputs.max_budget,
                outputs.inputs.max_budget,
                self.inputs.min_rating,
                outputs.inputs.min_rating
            );
        }
        self.inputs = outputs.inputs;
        self.bounds = outputs.budget_bounds;

        Ok(Report::new(self.config.data_path.display().to_string(), outputs))
    }

    /// Render once, then re-render after every input change until `quit` or
    /// end of input.
    pub fn run_session<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        self.render_to(&mut output)?;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    warn!("Rejected command '{}': {}", line.trim(), e);
                    writeln!(output, "{}\n{}", e, HELP)?;
                    continue;
                }
            };

            match command {
                Command::Budget(amount) => {
                    let inputs = UserInputs { max_budget: amount, ..self.inputs }.snapped(self.bounds);
                    self.update(inputs, &mut output)?
                }
                Command::Rating(rating) => {
                    let inputs = UserInputs { min_rating: rating, ..self.inputs }.snapped(self.bounds);
                    self.update(inputs, &mut output)?
                }
                Command::Show => self.render_to(&mut output)?,
                Command::Help => writeln!(output, "{}", HELP)?,
                Command::Quit => break,
            }
        }

        info!("Dashboard session finished");
        Ok(())
    }

    fn update<W: Write>(&mut self, inputs: UserInputs, output: &mut W) -> Result<()> {
        if inputs == self.inputs {
            writeln!(output, "Inputs unchanged.")?;
            return Ok(());
        }
        self.inputs = inputs;
        self.render_to(output)
    }

    fn render_to<W: Write>(&mut self, output: &mut W) -> Result<()> {
        let report = self.refresh()?;
        let rendered = report.render(self.config.report_format)?;
        writeln!(output, "{}", rendered)?;
        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NO_RESULTS_NOTICE;
    use std::io::{Cursor, Write as _};
    use tempfile::NamedTempFile;

    fn dataset() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,main_category,sub_category,actual_price,discount_price,ratings,link").unwrap();
        writeln!(file, "A,appliances,Air Conditioners,\"₹40,000\",\"₹30,000\",4.5,https://example.com/a").unwrap();
        writeln!(file, "B,appliances,Air Conditioners,\"₹60,000\",\"₹45,000\",4.8,https://example.com/b").unwrap();
        writeln!(file, "C,appliances,Air Conditioners,\"₹30,000\",\"₹27,000\",4.0,").unwrap();
        file
    }

    fn dashboard(file: &NamedTempFile) -> Dashboard {
        let config = DashboardConfig {
            data_path: file.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        Dashboard::new(config, LoadCache::new())
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("budget 45,000".parse::<Command>().unwrap(), Command::Budget(45_000));
        assert_eq!("RATING 4.2".parse::<Command>().unwrap(), Command::Rating(4.2));
        assert_eq!("show".parse::<Command>().unwrap(), Command::Show);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert!("budget".parse::<Command>().is_err());
        assert!("budget lots".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_session_rerenders_on_change() {
        let file = dataset();
        let mut dashboard = dashboard(&file);

        let input = Cursor::new("rating 5\nbudget 35000\nquit\nrating 1\n");
        let mut output = Vec::new();
        dashboard.run_session(input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("# Sales Dashboard").count(), 3);
        assert!(text.contains(NO_RESULTS_NOTICE));
        // the command after quit is never applied
        assert_eq!(dashboard.inputs(), UserInputs::new(35_000, 5.0));
        assert_eq!(dashboard.cache().len(), 1);
    }

    #[test]
    fn test_budget_is_clamped_to_observed_prices() {
        let file = dataset();
        let mut dashboard = dashboard(&file);

        let input = Cursor::new("budget 1000000\n");
        dashboard.run_session(input, Vec::new()).unwrap();
        assert_eq!(dashboard.inputs().max_budget, 60_000);
    }

    #[test]
    fn test_entered_values_snap_to_input_steps() {
        let file = dataset();
        let mut dashboard = dashboard(&file);

        dashboard
            .run_session(Cursor::new("budget 43000\nrating 4.26\n"), Vec::new())
            .unwrap();
        assert_eq!(dashboard.inputs(), UserInputs::new(45_000, 4.3));
    }

    #[test]
    fn test_bad_command_keeps_session_alive() {
        let file = dataset();
        let mut dashboard = dashboard(&file);

        let mut output = Vec::new();
        dashboard
            .run_session(Cursor::new("fly away\nshow\n"), &mut output)
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Unknown command: fly"));
        assert_eq!(text.matches("# Sales Dashboard").count(), 2);
    }

    #[test]
    fn test_missing_dataset_is_fatal() {
        let config = DashboardConfig {
            data_path: "no/such/file.csv".into(),
            ..DashboardConfig::default()
        };
        let mut dashboard = Dashboard::new(config, LoadCache::new());
        assert!(dashboard.refresh().is_err());
    }
}
