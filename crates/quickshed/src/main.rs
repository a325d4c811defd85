//! Quickshed command-line console.
//!
//! # Environment Variables
//!
//! - `QUICKSHED_API_URL`: backend base URL (default: http://127.0.0.1:8000/api/)
//! - `QUICKSHED_SESSION_FILE`: where tokens are stored
//! - `RUST_LOG`: log level (default: warn, or debug with `--verbose`)

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use quickshed::config::ClientConfig;
use quickshed::console::{render, Console, ConsoleError, ViewRealm};
use quickshed::gateway::{SubjectDraft, TeacherDraft};
use quickshed::notify::LogNotifier;
use quickshed::session::{Realm, Route, Session};
use quickshed::timetable::Day;

#[derive(Parser, Debug)]
#[command(name = "quickshed")]
#[command(about = "Quickshed - school timetable console")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "quickshed.toml")]
    config: PathBuf,

    /// Log requests and gate decisions
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the tokens
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "QUICKSHED_PASSWORD", hide_env_values = true)]
        password: String,
        /// Use the admin login
        #[arg(long)]
        admin: bool,
    },
    /// Register a user account
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Forget the stored tokens
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Get a new access token with the stored refresh token
    Refresh,
    /// Admin overview: counts and semesters
    Dashboard,
    /// Semesters and their divisions
    Structure,
    #[command(subcommand)]
    Teachers(TeachersCommand),
    #[command(subcommand)]
    Subjects(SubjectsCommand),
    #[command(subcommand)]
    Timetable(TimetableCommand),
}

#[derive(Subcommand, Debug)]
enum TeachersCommand {
    List,
    /// A teacher with assigned and available subjects
    Show { id: u64 },
    Add(TeacherFields),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: TeacherFields,
    },
    Delete { id: u64 },
    /// Let a teacher take a subject
    Assign { teacher: u64, subject: u64 },
    Unassign { teacher: u64, subject: u64 },
    /// Every teacher/subject relation
    Assignments,
}

#[derive(Args, Debug)]
struct TeacherFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    department: Option<String>,
}

impl From<TeacherFields> for TeacherDraft {
    fn from(fields: TeacherFields) -> Self {
        TeacherDraft {
            name: fields.name,
            phone_number: fields.phone,
            department: fields.department,
        }
    }
}

#[derive(Subcommand, Debug)]
enum SubjectsCommand {
    List {
        #[arg(long)]
        semester: Option<u32>,
    },
    Show { id: u64 },
    Add(SubjectFields),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: SubjectFields,
    },
    Delete { id: u64 },
}

#[derive(Args, Debug)]
struct SubjectFields {
    #[arg(long)]
    semester: Option<u32>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    code: Option<String>,
}

impl From<SubjectFields> for SubjectDraft {
    fn from(fields: SubjectFields) -> Self {
        SubjectDraft {
            semester: fields.semester,
            name: fields.name,
            subject_code: fields.code,
        }
    }
}

#[derive(Args, Debug)]
struct Division {
    #[arg(long)]
    semester: u32,
    #[arg(long)]
    grade: Option<String>,
}

#[derive(Subcommand, Debug)]
enum TimetableCommand {
    Show {
        #[command(flatten)]
        division: Division,
        /// Open from the admin console
        #[arg(long)]
        admin: bool,
    },
    /// Fill an empty cell
    Assign {
        #[command(flatten)]
        division: Division,
        #[arg(long)]
        day: Day,
        #[arg(long)]
        slot: String,
        #[arg(long)]
        subject: u64,
        #[arg(long)]
        teacher: u64,
    },
    /// Clear an occupied cell
    Remove {
        #[command(flatten)]
        division: Division,
        #[arg(long)]
        day: Day,
        #[arg(long)]
        slot: String,
    },
    /// Write the printable HTML page
    Print {
        #[command(flatten)]
        division: Division,
        #[arg(long)]
        admin: bool,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fill every timetable automatically
    Populate,
    /// Remove every slot assignment
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ConsoleError>() {
                Some(ConsoleError::Redirect(route)) => eprintln!("{}", redirect_hint(route)),
                // the notifier already printed it
                Some(reported) if reported.is_reported() => {
                    debug!(error = %reported, "Action failed")
                }
                _ => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default_level),
        )
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn redirect_hint(route: &Route) -> String {
    match route {
        Route::AdminLogin => "Not signed in. Run `quickshed login --admin` first.".to_string(),
        Route::UserLogin => "Not signed in. Run `quickshed login` first.".to_string(),
        other if other.realm() == Realm::Admin => {
            format!("Already signed in; continue at {other}. Run `quickshed logout` to switch accounts.")
        }
        other => format!("Already signed in; continue at {other}."),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let session = Session::from_file(config.session_file.clone());
    let console = Console::new(&config, session, Arc::new(LogNotifier))?;

    match cli.command {
        Command::Login {
            email,
            password,
            admin,
        } => console.login(&email, &password, admin).await?,
        Command::Signup {
            email,
            password,
            confirm,
        } => console.signup(&email, &password, &confirm).await?,
        Command::Logout => console.logout().await?,
        Command::Whoami => {
            let user = console.whoami().await?;
            println!("{} (id {})", user.email, user.id);
        }
        Command::Refresh => console.refresh().await?,
        Command::Dashboard => {
            let summary = console.admin_summary().await?;
            print!("{}", render::summary_text(&summary));
        }
        Command::Structure => {
            let structure = console.structure().await?;
            print!("{}", render::structure_text(&structure));
        }
        Command::Teachers(cmd) => run_teachers(&console, cmd).await?,
        Command::Subjects(cmd) => run_subjects(&console, cmd).await?,
        Command::Timetable(cmd) => run_timetable(&console, cmd).await?,
    }
    Ok(())
}

async fn run_teachers(console: &Console, cmd: TeachersCommand) -> Result<(), ConsoleError> {
    match cmd {
        TeachersCommand::List => {
            let teachers = console.teachers().await?;
            print!("{}", render::teachers_text(&teachers));
        }
        TeachersCommand::Show { id } => {
            let profile = console.teacher_profile(id).await?;
            print!("{}", render::teachers_text(std::slice::from_ref(&profile.teacher)));
            println!("Assigned:");
            print!("{}", render::subjects_text(&profile.assigned.iter().collect::<Vec<_>>()));
            println!("Available:");
            print!("{}", render::subjects_text(&profile.available.iter().collect::<Vec<_>>()));
        }
        TeachersCommand::Add(fields) => {
            let teacher = console.add_teacher(&fields.into()).await?;
            println!("{}", teacher.id);
        }
        TeachersCommand::Edit { id, fields } => {
            console.edit_teacher(id, &fields.into()).await?;
        }
        TeachersCommand::Delete { id } => console.delete_teacher(id).await?,
        TeachersCommand::Assign { teacher, subject } => {
            console.assign_subject(teacher, subject).await?;
        }
        TeachersCommand::Unassign { teacher, subject } => {
            console.unassign_subject(teacher, subject).await?;
        }
        TeachersCommand::Assignments => {
            let assignments = console.assignments().await?;
            print!("{}", render::assignments_text(&assignments));
        }
    }
    Ok(())
}

async fn run_subjects(console: &Console, cmd: SubjectsCommand) -> Result<(), ConsoleError> {
    match cmd {
        SubjectsCommand::List { semester } => {
            let subjects = console.subjects(semester).await?;
            print!("{}", render::subjects_text(&subjects.iter().collect::<Vec<_>>()));
        }
        SubjectsCommand::Show { id } => {
            let subject = console.subject(id).await?;
            print!("{}", render::subjects_text(&[&subject]));
        }
        SubjectsCommand::Add(fields) => {
            let subject = console.add_subject(&fields.into()).await?;
            println!("{}", subject.id);
        }
        SubjectsCommand::Edit { id, fields } => {
            console.edit_subject(id, &fields.into()).await?;
        }
        SubjectsCommand::Delete { id } => console.delete_subject(id).await?,
    }
    Ok(())
}

async fn run_timetable(console: &Console, cmd: TimetableCommand) -> anyhow::Result<()> {
    match cmd {
        TimetableCommand::Show { division, admin } => {
            let realm = if admin { ViewRealm::Admin } else { ViewRealm::User };
            let page = console
                .timetable(realm, division.semester, division.grade.as_deref())
                .await?;
            print!("{}", render::timetable_text(page.grid()));
        }
        TimetableCommand::Assign {
            division,
            day,
            slot,
            subject,
            teacher,
        } => {
            let page = console
                .assign_slot(
                    division.semester,
                    division.grade.as_deref(),
                    day,
                    &slot,
                    subject,
                    teacher,
                )
                .await?;
            print!("{}", render::timetable_text(page.grid()));
        }
        TimetableCommand::Remove {
            division,
            day,
            slot,
        } => {
            let page = console
                .clear_slot(division.semester, division.grade.as_deref(), day, &slot)
                .await?;
            print!("{}", render::timetable_text(page.grid()));
        }
        TimetableCommand::Print {
            division,
            admin,
            output,
        } => {
            let realm = if admin { ViewRealm::Admin } else { ViewRealm::User };
            let document = console
                .print_document(realm, division.semester, division.grade.as_deref())
                .await?;
            match output {
                Some(path) => fs::write(&path, document)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{document}"),
            }
        }
        TimetableCommand::Populate => {
            console.populate().await?;
        }
        TimetableCommand::Clear => {
            console.clear_all().await?;
        }
    }
    Ok(())
}
