//! `gmp-workflow` command line: inspect navigation and rule tables

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use gmp_access::{HasRuleTable, PermissionResolver, TransitionRule};
use gmp_types::{CoaStatus, DeviationStatus, PoStatus, RecordType, Role, WorkflowState};
use gmp_workflow::{telemetry, WorkflowConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("gmp-workflow")
        .version(gmp_workflow::VERSION)
        .about("GMP workflow core: navigation, transition rules and table checks")
        .arg(
            Arg::new("config")
                .long("config")
                .help("YAML or TOML configuration file"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("nav")
                .about("Print the navigation visible to a role")
                .arg(
                    Arg::new("role")
                        .long("role")
                        .required(true)
                        .help("Role display name, e.g. \"QA Head\""),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("Print transition rule tables")
                .arg(
                    Arg::new("record")
                        .long("record")
                        .help("Only this record type (deviation, po, coa)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(Command::new("check").about("Validate every rule table"));

    let matches = cli.get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => WorkflowConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => WorkflowConfig::default(),
    };
    telemetry::init(&config.log).context("installing log subscriber")?;

    match matches.subcommand() {
        Some(("nav", args)) => nav(args),
        Some(("rules", args)) => rules(args),
        Some(("check", _)) => check(),
        _ => bail!("unknown command"),
    }
}

fn nav(args: &ArgMatches) -> anyhow::Result<()> {
    let name = args.get_one::<String>("role").map(String::as_str).unwrap_or_default();
    let role: Role = name.parse().with_context(|| format!("unknown role {name:?}"))?;
    let entries = PermissionResolver::new().visible_navigation(role);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    println!("{role} ({}) sees {} entries:", role.department(), entries.len());
    for entry in entries {
        println!("  {:<28} {}", entry.key, entry.display_name);
    }
    Ok(())
}

fn rules(args: &ArgMatches) -> anyhow::Result<()> {
    let only = args
        .get_one::<String>("record")
        .map(|s| s.parse::<RecordType>())
        .transpose()
        .context("unknown record type")?;
    let json = args.get_flag("json");

    for record_type in [
        RecordType::Deviation,
        RecordType::PurchaseOrder,
        RecordType::CertificateOfAnalysis,
    ] {
        if only.is_some_and(|t| t != record_type) {
            continue;
        }
        match record_type {
            RecordType::Deviation => print_table::<DeviationStatus>(json)?,
            RecordType::PurchaseOrder => print_table::<PoStatus>(json)?,
            RecordType::CertificateOfAnalysis => print_table::<CoaStatus>(json)?,
        }
    }
    Ok(())
}

fn print_table<S: HasRuleTable>(json: bool) -> anyhow::Result<()> {
    let rules: &[TransitionRule<S>] = S::table().rules();
    if json {
        println!("{}", serde_json::to_string_pretty(rules)?);
        return Ok(());
    }
    println!("{}:", S::RECORD_TYPE);
    for rule in rules {
        let roles: Vec<String> = rule.allowed_roles.iter().map(|r| r.to_string()).collect();
        println!(
            "  {:<28} -> {:<28} {:<30} {}{}",
            rule.from.as_str(),
            rule.to.as_str(),
            rule.label,
            roles.join(", "),
            if rule.requires_esign { " [e-sign]" } else { "" }
        );
    }
    Ok(())
}

fn check() -> anyhow::Result<()> {
    gmp_access::validate_all().context("rule table defect")?;
    println!("all rule tables valid");
    Ok(())
}
