use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use regsnap_diff::{diff, diff_nested, DiffReport, NestedChange};
use regsnap_document::{
    encode_document, encode_nested_changes, encode_report, load_snapshot, save_snapshot, Snapshot,
};
use regsnap_reader::{ReaderConfig, TreeReader};
use regsnap_store::KeyStore;
use regsnap_types::{RegistryPath, TreeNode};

use crate::cli::*;
use crate::config::CliConfig;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if !config.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Read(args) => cmd_read(args, cli.format, &config),
        Command::Compare(args) => cmd_compare(args, cli.format, &config),
    }
}

fn cmd_read(args: ReadArgs, format: OutputFormat, config: &CliConfig) -> anyhow::Result<()> {
    let root = RegistryPath::parse(&args.root)?;
    let reader_config = config.reader_with(args.max_depth, args.skip_inaccessible);
    let store = live_store()?;
    let snapshot = capture(store.as_ref(), &root, reader_config)?;

    match &args.output {
        Some(path) => {
            save_snapshot(path, &snapshot)?;
            println!(
                "{} Saved snapshot of {} to {}",
                "✓".green().bold(),
                root.to_string().bold(),
                path.display()
            );
            println!("  {}", render::stats_line(&snapshot.tree));
        }
        None => match format {
            OutputFormat::Json => println!("{}", encode_document(&snapshot, config.pretty)?),
            OutputFormat::Text => print!("{}", render::tree_text(&root.to_string(), &snapshot.tree)),
        },
    }
    Ok(())
}

#[cfg(windows)]
fn live_store() -> anyhow::Result<Box<dyn KeyStore>> {
    Ok(Box::new(regsnap_store::WindowsRegistry::new()))
}

#[cfg(not(windows))]
fn live_store() -> anyhow::Result<Box<dyn KeyStore>> {
    anyhow::bail!("live registry access requires Windows")
}

fn capture<S: KeyStore + ?Sized>(
    store: &S,
    root: &RegistryPath,
    config: ReaderConfig,
) -> anyhow::Result<Snapshot> {
    let tree = TreeReader::with_config(store, config).read_path(root)?;
    Ok(Snapshot::new(root, tree))
}

fn cmd_compare(args: CompareArgs, format: OutputFormat, config: &CliConfig) -> anyhow::Result<()> {
    let first = load_snapshot(&args.first)?;
    let second = load_snapshot(&args.second)?;
    let comparison = Comparison::of(&first.tree, &second.tree, args.nested);

    if let Some(path) = &args.output {
        let json = comparison.to_json(config.pretty)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        println!(
            "{} Report written to {} ({} differences)",
            "✓".green().bold(),
            path.display(),
            comparison.len()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", comparison.to_json(config.pretty)?),
        OutputFormat::Text => print!(
            "{}",
            comparison.to_text(&label(&first, &args.first), &label(&second, &args.second))
        ),
    }
    Ok(())
}

/// How a compared document is named in text output: its recorded root if it
/// has one, otherwise its file name.
fn label(snapshot: &Snapshot, path: &Path) -> String {
    match &snapshot.root {
        Some(root) => format!("{} ({root})", path.display()),
        None => path.display().to_string(),
    }
}

enum Comparison {
    Report(DiffReport),
    Nested(Vec<NestedChange>),
}

impl Comparison {
    fn of(first: &TreeNode, second: &TreeNode, nested: bool) -> Self {
        if nested {
            Self::Nested(diff_nested(first, second))
        } else {
            Self::Report(diff(first, second))
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Report(report) => report.len(),
            Self::Nested(changes) => changes.len(),
        }
    }

    fn to_json(&self, pretty: bool) -> anyhow::Result<String> {
        let json = match self {
            Self::Report(report) => encode_report(report, pretty)?,
            Self::Nested(changes) => encode_nested_changes(changes, pretty)?,
        };
        Ok(json)
    }

    fn to_text(&self, first: &str, second: &str) -> String {
        match self {
            Self::Report(report) => render::report_text(report, first, second),
            Self::Nested(changes) => render::nested_text(changes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regsnap_store::InMemoryKeyStore;
    use regsnap_types::{Hive, Value};
    use std::path::PathBuf;

    fn write_snapshot(dir: &Path, name: &str, tree: TreeNode) -> PathBuf {
        let path = dir.join(name);
        save_snapshot(&path, &Snapshot::from_tree(tree)).unwrap();
        path
    }

    fn compare_args(first: PathBuf, second: PathBuf, output: Option<PathBuf>, nested: bool) -> CompareArgs {
        CompareArgs { first, second, output, nested }
    }

    #[test]
    fn capture_from_store() {
        let store = InMemoryKeyStore::new();
        store.set_value(Hive::CurrentUser, r"Software\Vendor", "Ver", "1.0");
        store.set_value(Hive::CurrentUser, r"Software\Vendor\Sub", "n", 7u32);

        let root = RegistryPath::parse(r"HKCU\Software\Vendor").unwrap();
        let snapshot = capture(&store, &root, ReaderConfig::default()).unwrap();
        assert_eq!(snapshot.root.as_deref(), Some(r"HKEY_CURRENT_USER\Software\Vendor"));
        assert!(snapshot.captured_at.is_some());
        assert_eq!(
            snapshot.tree,
            TreeNode::new()
                .with("Ver", Value::from("1.0"))
                .with("Sub", TreeNode::new().with("n", Value::Dword(7)))
        );
        assert_eq!(store.open_handles(), 0);
    }

    #[test]
    fn capture_missing_root_fails() {
        let store = InMemoryKeyStore::new();
        let root = RegistryPath::parse(r"HKLM\Nope").unwrap();
        assert!(capture(&store, &root, ReaderConfig::default()).is_err());
    }

    #[test]
    fn capture_respects_depth_override() {
        let store = InMemoryKeyStore::new();
        store.create_key(Hive::CurrentUser, r"A\B\C");
        let root = RegistryPath::parse(r"HKCU\A").unwrap();
        let config = CliConfig::default().reader_with(Some(1), false);
        assert!(capture(&store, &root, config).is_err());
    }

    #[cfg(not(windows))]
    #[test]
    fn live_read_unavailable_off_windows() {
        let err = live_store().err().unwrap();
        assert!(err.to_string().contains("requires Windows"));
    }

    #[test]
    fn compare_writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_snapshot(dir.path(), "a.json", TreeNode::new().with("Ver", Value::from("1.0")));
        let second = write_snapshot(dir.path(), "b.json", TreeNode::new().with("Ver", Value::from("2.0")));
        let report = dir.path().join("report.json");

        let args = compare_args(first, second, Some(report.clone()), false);
        cmd_compare(args, OutputFormat::Text, &CliConfig::default()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(written["changed"]["Ver"]["new"]["data"], "2.0");
    }

    #[test]
    fn compare_nested_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_snapshot(
            dir.path(),
            "a.json",
            TreeNode::new().with("K", TreeNode::new().with("n", Value::Dword(1))),
        );
        let second = write_snapshot(
            dir.path(),
            "b.json",
            TreeNode::new().with("K", TreeNode::new().with("n", Value::Dword(2))),
        );
        let report = dir.path().join("report.json");

        let args = compare_args(first, second, Some(report.clone()), true);
        cmd_compare(args, OutputFormat::Json, &CliConfig::default()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(written[0]["path"], r"K\n");
        assert_eq!(written[0]["change"], "modified");
    }

    #[test]
    fn compare_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let second = write_snapshot(dir.path(), "b.json", TreeNode::new());
        let args = compare_args(dir.path().join("missing.json"), second, None, false);
        let err = cmd_compare(args, OutputFormat::Text, &CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn compare_malformed_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let second = write_snapshot(dir.path(), "b.json", TreeNode::new());
        let args = compare_args(bad, second, None, false);
        assert!(cmd_compare(args, OutputFormat::Text, &CliConfig::default()).is_err());
    }

    #[test]
    fn comparison_counts() {
        let first = TreeNode::new().with("K", TreeNode::new().with("a", Value::Dword(1)).with("b", Value::Dword(1)));
        let second = TreeNode::new().with("K", TreeNode::new().with("a", Value::Dword(2)).with("b", Value::Dword(2)));
        assert_eq!(Comparison::of(&first, &second, false).len(), 1);
        assert_eq!(Comparison::of(&first, &second, true).len(), 2);
    }

    #[test]
    fn label_prefers_recorded_root() {
        let root = RegistryPath::parse("HKCU").unwrap();
        let snapshot = Snapshot::new(&root, TreeNode::new());
        assert_eq!(label(&snapshot, Path::new("a.json")), "a.json (HKEY_CURRENT_USER)");
        assert_eq!(label(&Snapshot::from_tree(TreeNode::new()), Path::new("b.json")), "b.json");
    }
}
