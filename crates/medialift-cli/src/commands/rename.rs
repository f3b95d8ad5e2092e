//! `medialift rename` command implementation
//!
//! Numbers every requested destination name so duplicates cannot collide.

use crate::dedupe::{disambiguate, numbered_name, Disambiguation, NameGroup};
use crate::error::Result;
use crate::manifest::Manifest;
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Column holding the requested destination name
pub const NAME_COLUMN: &str = "new_name";

/// Column the final name is written to
pub const RENAMED_COLUMN: &str = "renamed";

/// How many name mappings the summary shows
const EXAMPLE_COUNT: usize = 5;

/// Rename every row of `input` and write the result to `output`
pub async fn run(input: &Path, output: &Path) -> Result<()> {
    println!("{} Reading {}...", "→".cyan(), input.display());
    let mut manifest = Manifest::load(input)?;

    let result = apply(&mut manifest)?;
    manifest.save(output)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = result.stats.total,
        "Rename complete"
    );

    print_summary(&result, output);
    Ok(())
}

/// Fill the `renamed` column from `new_name`, overwriting a previous run's values
pub fn apply(manifest: &mut Manifest) -> Result<Disambiguation> {
    let name_col = manifest.require_column(NAME_COLUMN)?;

    let requested: Vec<String> = (0..manifest.len())
        .map(|row| manifest.get(row, name_col).to_string())
        .collect();
    let result = disambiguate(&requested);

    let renamed_col = manifest.ensure_column(RENAMED_COLUMN);
    for (row, final_name) in result.final_names.iter().enumerate() {
        manifest.set(row, renamed_col, final_name.as_str());
    }

    Ok(result)
}

/// One summary line showing how a requested name was expanded
pub fn describe_group(group: &NameGroup) -> String {
    let first = numbered_name(&group.requested, 1);
    match group.occurrences {
        0 | 1 => format!("{} → {} (unique)", group.requested, first),
        2 => format!(
            "{} → {}, {} (2 copies)",
            group.requested,
            first,
            numbered_name(&group.requested, 2)
        ),
        n => format!(
            "{} → {}, {}, ... ({} copies)",
            group.requested,
            first,
            numbered_name(&group.requested, 2),
            n
        ),
    }
}

fn print_summary(result: &Disambiguation, output: &Path) {
    let stats = &result.stats;

    println!();
    println!("{}", "Rename Summary:".cyan().bold());
    println!("  Total files: {}", stats.total);
    println!("  Unique names: {}", stats.distinct);
    println!("  Names with duplicates: {}", stats.duplicated);
    if stats.blank > 0 {
        println!("  Blank names (left empty): {}", stats.blank);
    }

    if !result.groups.is_empty() {
        println!();
        println!("{}", "Examples:".cyan().bold());
        for group in result.groups.iter().take(EXAMPLE_COUNT) {
            println!("  {}", describe_group(group));
        }
    }

    println!();
    println!("{} Saved to {}", "✓".green(), output.display());
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest(csv: &str) -> Manifest {
        Manifest::from_reader(csv.as_bytes(), "input.csv").unwrap()
    }

    #[test]
    fn test_apply_adds_renamed_column() {
        let mut m = manifest("filename,new_name\nx,a.mp4\ny,a.mp4\nz,b.txt\nw,\n");
        let result = apply(&mut m).unwrap();

        assert_eq!(m.headers(), &["filename", "new_name", "renamed"]);
        let renamed: Vec<&str> = (0..m.len()).map(|r| m.value(r, RENAMED_COLUMN)).collect();
        assert_eq!(renamed, vec!["a-1.mp4", "a-2.mp4", "b-1.txt", ""]);
        assert_eq!(result.stats.blank, 1);
    }

    #[test]
    fn test_apply_on_own_output_is_stable() {
        let mut m = manifest("new_name,renamed\na.mp4,stale\na.mp4,stale\n");
        apply(&mut m).unwrap();
        assert_eq!(m.headers(), &["new_name", "renamed"]);
        assert_eq!(m.value(0, RENAMED_COLUMN), "a-1.mp4");
        assert_eq!(m.value(1, RENAMED_COLUMN), "a-2.mp4");
    }

    #[test]
    fn test_apply_requires_name_column() {
        let mut m = manifest("filename,title\nx,y\n");
        let err = apply(&mut m).unwrap_err();
        assert!(err.to_string().contains("new_name"));
    }

    #[test]
    fn test_describe_group() {
        let unique = NameGroup { requested: "x.mp4".into(), occurrences: 1 };
        assert_eq!(describe_group(&unique), "x.mp4 → x-1.mp4 (unique)");

        let pair = NameGroup { requested: "x.mp4".into(), occurrences: 2 };
        assert_eq!(describe_group(&pair), "x.mp4 → x-1.mp4, x-2.mp4 (2 copies)");

        let many = NameGroup { requested: "x.mp4".into(), occurrences: 4 };
        assert_eq!(describe_group(&many), "x.mp4 → x-1.mp4, x-2.mp4, ... (4 copies)");
    }

    #[tokio::test]
    async fn test_run_writes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.csv");
        let output = dir.path().join("out/deduped_files.csv");
        std::fs::write(&input, "filename,new_name\nf1,clip.mov\nf2,clip.mov\n").unwrap();

        run(&input, &output).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("filename,new_name,renamed"));
        assert!(written.contains("f1,clip.mov,clip-1.mov"));
        assert!(written.contains("f2,clip.mov,clip-2.mov"));
    }
}
