//! Scaffolding for a new puzzle day
//!
//! Renders a solver template into `{root}/year_{year}/day_{day}.rs` and wires
//! the new module into the `mod.rs` files above it.

use crate::calendar;
use crate::cli::BootstrapArgs;
use crate::error::CliError;
use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_TEMPLATE: &str = include_str!("../templates/solver.rs.tmpl");

/// A fully resolved bootstrap request
#[derive(Debug)]
pub struct Plan {
    pub year: u16,
    pub day: u8,
    pub template: Option<PathBuf>,
    pub puzzle_root: PathBuf,
    pub force: bool,
}

impl Plan {
    /// Fill in the year and day defaults relative to `now`
    pub fn resolve(args: BootstrapArgs, now: DateTime<Utc>) -> Result<Self, CliError> {
        let day = match args.day {
            Some(day) => u32::from(day),
            None => {
                let day = calendar::likely_puzzle_day(now);
                info!(day, "no day given, using the next puzzle release");
                day
            }
        };
        if !(1..=25).contains(&day) {
            return Err(CliError::Config(format!(
                "day {} is outside the event (1-25)",
                day
            )));
        }

        Ok(Self {
            year: args
                .year
                .unwrap_or_else(|| calendar::latest_event_year(now)),
            day: day as u8,
            template: args.template,
            puzzle_root: args.puzzle_root,
            force: args.force,
        })
    }

    pub fn target(&self) -> PathBuf {
        self.year_dir().join(format!("day_{}.rs", self.day))
    }

    fn year_dir(&self) -> PathBuf {
        self.puzzle_root.join(format!("year_{}", self.year))
    }
}

/// Substitute `{{ year }}`, `{{ day }}` and `{{ day_padded }}`
pub fn render(template: &str, year: u16, day: u8) -> Result<String, CliError> {
    let placeholder =
        Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").map_err(|e| CliError::Template(e.to_string()))?;

    let mut unknown: Option<String> = None;
    let rendered = placeholder.replace_all(template, |caps: &Captures| match &caps[1] {
        "year" => year.to_string(),
        "day" => day.to_string(),
        "day_padded" => format!("{:02}", day),
        other => {
            unknown.get_or_insert_with(|| other.to_string());
            String::new()
        }
    });

    match unknown {
        Some(name) => Err(CliError::Template(format!("unknown placeholder `{}`", name))),
        None => Ok(rendered.into_owned()),
    }
}

/// Write the rendered template and register the module; returns the new file's path
pub fn run(plan: &Plan) -> Result<PathBuf, CliError> {
    let template = match &plan.template {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CliError::Template(format!("cannot read {}: {}", path.display(), e))
        })?,
        None => DEFAULT_TEMPLATE.to_string(),
    };
    let source = render(&template, plan.year, plan.day)?;

    let target = plan.target();
    if target.exists() && !plan.force {
        return Err(CliError::TargetExists(target));
    }

    fs::create_dir_all(plan.year_dir())?;
    println!("rendering template into {}", target.display());
    fs::write(&target, source)?;

    ensure_mod_decl(
        &plan.year_dir().join("mod.rs"),
        &format!("day_{}", plan.day),
    )?;
    ensure_mod_decl(
        &plan.puzzle_root.join("mod.rs"),
        &format!("year_{}", plan.year),
    )?;

    Ok(target)
}

/// Append `pub mod {module};` to `mod_rs` unless it is already declared
fn ensure_mod_decl(mod_rs: &Path, module: &str) -> Result<bool, CliError> {
    let decl = format!("pub mod {};", module);
    let mut content = match fs::read_to_string(mod_rs) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if content.lines().any(|line| line.trim() == decl) {
        debug!(file = %mod_rs.display(), module, "module already declared");
        return Ok(false);
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&decl);
    content.push('\n');
    fs::write(mod_rs, content)?;
    debug!(file = %mod_rs.display(), module, "declared module");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn plan(root: &Path, day: u8) -> Plan {
        Plan {
            year: 2020,
            day,
            template: None,
            puzzle_root: root.to_path_buf(),
            force: false,
        }
    }

    fn args(day: Option<u8>, year: Option<u16>) -> BootstrapArgs {
        BootstrapArgs {
            day,
            year,
            template: None,
            puzzle_root: PathBuf::from("solutions"),
            force: false,
        }
    }

    #[test]
    fn test_render_placeholders() {
        let out = render("y={{year}} d={{ day }} p={{  day_padded }}", 2020, 7).unwrap();
        assert_eq!(out, "y=2020 d=7 p=07");
    }

    #[test]
    fn test_render_rejects_unknown_placeholder() {
        let err = render("{{ year }} {{ month }}", 2020, 7).unwrap_err();
        assert!(err.to_string().contains("month"));
    }

    #[test]
    fn test_default_template_renders_completely() {
        let out = render(DEFAULT_TEMPLATE, 2020, 16).unwrap();
        assert!(out.contains("#[aoc(year = 2020, day = 16, tags = [])]"));
        assert!(out.contains("2020 day 16 part 1"));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_resolve_defaults_from_clock() {
        let now = Utc.with_ymd_and_hms(2020, 12, 16, 4, 30, 0).unwrap();
        let plan = Plan::resolve(args(None, None), now).unwrap();
        assert_eq!((plan.year, plan.day), (2020, 16));
        assert_eq!(
            plan.target(),
            Path::new("solutions").join("year_2020").join("day_16.rs")
        );

        let plan = Plan::resolve(args(Some(3), Some(2015)), now).unwrap();
        assert_eq!((plan.year, plan.day), (2015, 3));
    }

    #[test]
    fn test_resolve_rejects_days_outside_event() {
        let now = Utc.with_ymd_and_hms(2020, 12, 28, 12, 0, 0).unwrap();
        assert!(Plan::resolve(args(None, None), now).is_err());
        assert!(Plan::resolve(args(Some(0), None), now).is_err());
        assert!(Plan::resolve(args(Some(26), None), now).is_err());
    }

    #[test]
    fn test_bootstrap_writes_file_and_mod_decls() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("mod.rs"), "pub mod year_2015;").unwrap();

        let target = run(&plan(temp.path(), 16)).unwrap();
        assert_eq!(target, temp.path().join("year_2020").join("day_16.rs"));
        assert!(fs::read_to_string(&target).unwrap().contains("day = 16"));

        assert_eq!(
            fs::read_to_string(temp.path().join("mod.rs")).unwrap(),
            "pub mod year_2015;\npub mod year_2020;\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("year_2020").join("mod.rs")).unwrap(),
            "pub mod day_16;\n"
        );

        run(&plan(temp.path(), 17)).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("year_2020").join("mod.rs")).unwrap(),
            "pub mod day_16;\npub mod day_17;\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("mod.rs")).unwrap(),
            "pub mod year_2015;\npub mod year_2020;\n"
        );
    }

    #[test]
    fn test_bootstrap_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let mut plan = plan(temp.path(), 1);
        let target = run(&plan).unwrap();
        fs::write(&target, "// my solution").unwrap();

        assert!(matches!(run(&plan), Err(CliError::TargetExists(_))));
        assert_eq!(fs::read_to_string(&target).unwrap(), "// my solution");

        plan.force = true;
        run(&plan).unwrap();
        assert!(fs::read_to_string(&target).unwrap().contains("day = 1,"));
        assert_eq!(
            fs::read_to_string(temp.path().join("year_2020").join("mod.rs")).unwrap(),
            "pub mod day_1;\n"
        );
    }

    #[test]
    fn test_bootstrap_custom_template() {
        let temp = TempDir::new().unwrap();
        let template = temp.path().join("custom.tmpl");
        fs::write(&template, "// {{ year }}/{{ day_padded }}\n").unwrap();

        let mut plan = plan(&temp.path().join("src"), 5);
        plan.template = Some(template);
        let target = run(&plan).unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "// 2020/05\n");
    }

    #[test]
    fn test_bootstrap_bad_template_leaves_no_file() {
        let temp = TempDir::new().unwrap();
        let template = temp.path().join("bad.tmpl");
        fs::write(&template, "{{ nope }}").unwrap();

        let mut plan = plan(temp.path(), 5);
        plan.template = Some(template);
        assert!(matches!(run(&plan), Err(CliError::Template(_))));
        assert!(!plan.target().exists());
    }
}
