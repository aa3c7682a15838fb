#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # registro
//!
//! Command-line driver for the report pipeline: loads a JSON record fixture
//! into the in-memory store, assembles the requested report, and writes the
//! rendered artifact next to the fixture. The pipeline itself performs no
//! I/O; this binary is the calling layer.

use anyhow::{Context, Result, bail};
use bpaf::*;
use registro::{
    pipeline,
    records::Role,
    store::MemoryStore,
};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*};

/// Report-producing subcommands.
#[derive(Debug, Clone)]
enum ReportCmd {
    /// Report for one student, identified by institutional code.
    Student(String, String),
    /// Report for one subject, identified by institutional code.
    Subject(String, String),
    /// Administrative dossier for one student.
    Dossier(String, String),
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Generate a report from a record fixture.
    Report(String, ReportCmd),
    /// List the registered output formats.
    Formats,
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the institutional code of the report's audience
    fn code() -> impl Parser<String> {
        positional("CODE").help("Institutional code of the student or subject")
    }

    /// parses the output format identifier
    fn format() -> impl Parser<String> {
        long("format")
            .short('f')
            .help("Output format: json, html, or pdf (case-insensitive)")
            .argument("FORMAT")
            .fallback("pdf".to_string())
    }

    /// parses the record fixture path
    fn fixture() -> impl Parser<String> {
        long("records")
            .short('r')
            .help("Path to the JSON record fixture")
            .argument("PATH")
            .fallback("records.json".to_string())
    }

    let student = construct!(ReportCmd::Student(format(), code()))
        .to_options()
        .command("student")
        .help("Generate the subject list and weighted average for one student");

    let subject = construct!(ReportCmd::Subject(format(), code()))
        .to_options()
        .command("subject")
        .help("Generate the per-student grade listing for one subject");

    let dossier = construct!(ReportCmd::Dossier(format(), code()))
        .to_options()
        .command("dossier")
        .help("Generate the administrative dossier for one student");

    let report_cmd = construct!([student, subject, dossier]);
    let report = construct!(Cmd::Report(fixture(), report_cmd))
        .to_options()
        .command("report")
        .help("Assemble and render a report");

    let formats = pure(Cmd::Formats)
        .to_options()
        .command("formats")
        .help("List the registered output formats");

    construct!([report, formats])
        .to_options()
        .descr("Academic record reports")
        .run()
}

#[tokio::main]
async fn main() -> Result<()> {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry().with(fmt).with(filter).init();

    match options() {
        Cmd::Report(fixture, report_cmd) => {
            let json = std::fs::read_to_string(&fixture)
                .with_context(|| format!("Could not read record fixture `{fixture}`"))?;
            let store = MemoryStore::from_json(&json)?;

            let (document, format) = match report_cmd {
                ReportCmd::Student(format, code) => {
                    let student = find_person(&store, &code, Role::Student)?;
                    (pipeline::build_student_report(&store, student, true).await?, format)
                }
                ReportCmd::Subject(format, code) => {
                    let subject = store
                        .subject_by_code(&code)
                        .with_context(|| format!("No subject with code `{code}`"))?;
                    (pipeline::build_subject_report(&store, subject).await?, format)
                }
                ReportCmd::Dossier(format, code) => {
                    let student = find_person(&store, &code, Role::Student)?;
                    (pipeline::build_student_dossier(&store, student).await?, format)
                }
            };

            let artifact = pipeline::render(&document, &format)?;
            std::fs::write(&artifact.filename, &artifact.content)
                .with_context(|| format!("Could not write `{}`", artifact.filename))?;
            println!("{} ({})", artifact.filename, artifact.content_type);
        }
        Cmd::Formats => {
            for format in registro::report::factory::supported_formats() {
                println!("{format}");
            }
        }
    }

    Ok(())
}

/// Finds a person by institutional code, insisting on the expected role.
fn find_person<'a>(
    store: &'a MemoryStore,
    code: &str,
    role: Role,
) -> Result<&'a registro::records::Person> {
    let Some(person) = store.person_by_code(code) else {
        bail!("No person with code `{code}`");
    };
    if person.role != role {
        bail!("`{code}` is not a {role:?} code");
    }
    Ok(person)
}
