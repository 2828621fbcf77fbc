//! `msproj` CLI — create, edit and inspect function-point project files.
//!
//! ## Usage
//!
//! ```sh
//! # Start a project (writes payroll.ms)
//! msproj new payroll --name Payroll --creator Ada --language Java
//!
//! # Fill in the function-point worksheet
//! msproj fp payroll.ms --counts 10,5,3,2,1 --complexities 1,1,0,2,1 --vaf 3,3,3,3,3,3,3,3,3,3,3,3,3,3
//!
//! # Change the language used for the code-size estimate
//! msproj language payroll.ms Python
//!
//! # Print a summary (or --json for machine-readable output)
//! msproj show payroll.ms
//!
//! # Rewrite any document in canonical compact form (stdin → stdout)
//! echo '{ "a" : [ 1, 2.0 ] }' | msproj fmt
//! ```
//!
//! Set `RUST_LOG=debug` to see which fields were defaulted while loading.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use metrics_project::metrics::{
    weighted_count, FP_CATEGORY_COUNT, GSC_COUNT, MAX_GSC_RATING, SUPPORTED_LANGUAGES,
};
use metrics_project::{
    parse, project_from_str, project_to_string, stringify, Complexity, FpCategory,
    FunctionPointState, ProjectRecord,
};

/// File extension for project files.
const PROJECT_EXTENSION: &str = "ms";

#[derive(Parser)]
#[command(
    name = "msproj",
    version,
    about = "Function-point project (.ms) file tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty project file
    New {
        /// Output file; `.ms` is appended when missing
        file: PathBuf,
        /// Project name (defaults to "Untitled")
        #[arg(long, default_value = "")]
        name: String,
        /// Creator name (defaults to "Unknown")
        #[arg(long, default_value = "")]
        creator: String,
        /// Implementation language
        #[arg(long)]
        language: Option<String>,
    },
    /// Print a project summary with recomputed function points
    Show {
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute and store the function-point worksheet
    Fp {
        file: PathBuf,
        /// Five comma-separated counts: EI,EO,EQ,ILF,EIF
        #[arg(long)]
        counts: String,
        /// Five complexities, each 0/1/2 or simple/average/complex (default: average)
        #[arg(long)]
        complexities: Option<String>,
        /// Fourteen comma-separated ratings 0-5 (default: keep stored ratings)
        #[arg(long)]
        vaf: Option<String>,
        /// Language for the worksheet (default: the project language)
        #[arg(long)]
        language: Option<String>,
    },
    /// Set the project language
    Language { file: PathBuf, language: String },
    /// Rewrite a document in canonical compact form
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::New {
            file,
            name,
            creator,
            language,
        } => {
            let path = with_project_extension(file);
            let mut project = ProjectRecord::new(&name, &creator);
            project.language = language.filter(|l| !l.trim().is_empty());
            save_project(&path, &project)?;
            println!("Created {}", path.display());
        }
        Commands::Show { file, json } => {
            let project = load_project(&file)?;
            let summary = Summary::from_project(&project);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.render());
            }
        }
        Commands::Fp {
            file,
            counts,
            complexities,
            vaf,
            language,
        } => {
            let mut project = load_project(&file)?;
            let counts = parse_counts(&counts)?;
            let complexities = match complexities {
                Some(raw) => parse_complexities(&raw)?,
                None => [Complexity::default().index(); FP_CATEGORY_COUNT],
            };
            let vaf_values = match vaf {
                Some(raw) => parse_vaf(&raw)?,
                None => project
                    .fp_state
                    .as_ref()
                    .map_or([0; GSC_COUNT], |s| s.vaf_values),
            };
            let language = language.or_else(|| project.language.clone());
            let state = FunctionPointState::compute(language, counts, complexities, vaf_values);
            println!("Function points: {}", state.fp_formatted);
            project.fp_state = Some(state);
            save_project(&file, &project)?;
        }
        Commands::Language { file, language } => {
            let language = language.trim().to_string();
            if language.is_empty() {
                bail!("Language must not be blank");
            }
            if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
                warn!(%language, "no LOC/FP rate for language; estimates use the default rate");
            }
            let mut project = load_project(&file)?;
            if let Some(state) = project.fp_state.as_mut() {
                state.language = Some(language.clone());
            }
            project.language = Some(language);
            save_project(&file, &project)?;
        }
        Commands::Fmt { input, output } => {
            let text = read_input(input.as_deref())?;
            let value = parse(&text).context("Failed to parse document")?;
            write_output(output.as_deref(), &stringify(&value))?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for piping. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Project files
// ─────────────────────────────────────────────────────────────────────────────

fn with_project_extension(path: PathBuf) -> PathBuf {
    let has_ext = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(PROJECT_EXTENSION));
    if has_ext {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".");
        name.push(PROJECT_EXTENSION);
        PathBuf::from(name)
    }
}

fn load_project(path: &Path) -> Result<ProjectRecord> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let project = project_from_str(&text)
        .with_context(|| format!("Failed to load project: {}", path.display()))?;
    info!(path = %path.display(), project = %project.project_name, "loaded project");
    Ok(project)
}

fn save_project(path: &Path, project: &ProjectRecord) -> Result<()> {
    std::fs::write(path, project_to_string(project))
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    info!(path = %path.display(), "saved project");
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument lists
// ─────────────────────────────────────────────────────────────────────────────

/// Split a comma-separated list into exactly `N` items.
fn split_list<const N: usize>(raw: &str, what: &str) -> Result<[String; N]> {
    let items: Vec<String> = raw.split(',').map(|s| s.trim().to_string()).collect();
    let len = items.len();
    items
        .try_into()
        .map_err(|_| anyhow::anyhow!("Expected {} comma-separated {}, got {}", N, what, len))
}

fn parse_counts(raw: &str) -> Result<[i32; FP_CATEGORY_COUNT]> {
    let items = split_list::<FP_CATEGORY_COUNT>(raw, "counts")?;
    let mut out = [0; FP_CATEGORY_COUNT];
    for (slot, item) in out.iter_mut().zip(&items) {
        let n: i32 = item
            .parse()
            .with_context(|| format!("Invalid count: '{}'", item))?;
        if n < 0 {
            bail!("Counts must be non-negative, got {}", n);
        }
        *slot = n;
    }
    Ok(out)
}

fn parse_complexities(raw: &str) -> Result<[i32; FP_CATEGORY_COUNT]> {
    let items = split_list::<FP_CATEGORY_COUNT>(raw, "complexities")?;
    let mut out = [0; FP_CATEGORY_COUNT];
    for (slot, item) in out.iter_mut().zip(&items) {
        let complexity = match item.to_ascii_lowercase().as_str() {
            "0" | "simple" => Complexity::Simple,
            "1" | "average" => Complexity::Average,
            "2" | "complex" => Complexity::Complex,
            other => bail!("Invalid complexity: '{}' (use 0/1/2 or simple/average/complex)", other),
        };
        *slot = complexity.index();
    }
    Ok(out)
}

fn parse_vaf(raw: &str) -> Result<[i32; GSC_COUNT]> {
    let items = split_list::<GSC_COUNT>(raw, "VAF ratings")?;
    let mut out = [0; GSC_COUNT];
    for (slot, item) in out.iter_mut().zip(&items) {
        let n: i32 = item
            .parse()
            .with_context(|| format!("Invalid VAF rating: '{}'", item))?;
        if !(0..=MAX_GSC_RATING).contains(&n) {
            bail!("VAF ratings must be between 0 and {}, got {}", MAX_GSC_RATING, n);
        }
        *slot = n;
    }
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Summary output
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    project_name: String,
    creator_name: String,
    language: Option<String>,
    function_points: Option<FpSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FpSummary {
    categories: Vec<CategoryRow>,
    total_weighted: i32,
    vaf_sum: i32,
    function_points: f64,
    fp_formatted: String,
    code_size: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRow {
    category: &'static str,
    count: i32,
    complexity: &'static str,
    weighted: i32,
}

impl Summary {
    /// Derived fields are recomputed rather than trusted from the file.
    fn from_project(project: &ProjectRecord) -> Self {
        let function_points = project.fp_state.as_ref().map(|stored| {
            let mut state = stored.clone();
            state.recompute();
            let categories = FpCategory::ALL
                .iter()
                .zip(state.counts.iter().zip(&state.complexities))
                .map(|(&category, (&count, &cx))| {
                    let complexity = Complexity::from_index(cx).unwrap_or_default();
                    CategoryRow {
                        category: category.label(),
                        count,
                        complexity: complexity.label(),
                        weighted: weighted_count(category, count, complexity),
                    }
                })
                .collect();
            FpSummary {
                categories,
                total_weighted: state.total_weighted,
                vaf_sum: state.vaf_sum,
                function_points: state.function_points(),
                code_size: state
                    .code_size(project.language.as_deref())
                    .map(|e| e.to_string()),
                fp_formatted: state.fp_formatted,
            }
        });

        Summary {
            project_name: project.project_name.clone(),
            creator_name: project.creator_name.clone(),
            language: project.language.clone(),
            function_points,
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Project:  {}\n", self.project_name));
        out.push_str(&format!("Creator:  {}\n", self.creator_name));
        out.push_str(&format!(
            "Language: {}\n",
            self.language.as_deref().unwrap_or("None")
        ));

        let Some(fp) = &self.function_points else {
            out.push_str("\nFunction points: not computed\n");
            return out;
        };

        out.push('\n');
        for row in &fp.categories {
            out.push_str(&format!(
                "  {:<26} {:>6}  {:<8} {:>6}\n",
                row.category, row.count, row.complexity, row.weighted
            ));
        }
        out.push('\n');
        out.push_str(&format!("Total count:     {}\n", fp.total_weighted));
        out.push_str(&format!("VAF sum:         {}\n", fp.vaf_sum));
        out.push_str(&format!("Function points: {}\n", fp.fp_formatted));
        out.push_str(&format!(
            "Code size:       {}\n",
            fp.code_size.as_deref().unwrap_or("select a language first")
        ));
        out
    }
}
