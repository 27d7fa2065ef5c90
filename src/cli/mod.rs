use clap::{Parser, Subcommand};

use sekolah_api::resources::{
    Announcements,
    Achievements,
    Activities,
    Carousels,
    Levels,
    SubjectGrades,
    SocialMedias,
    Graduations,
    Students,
    Admissions,
};

use crate::config::{ConfigArgs, Settings};
use crate::error;
use crate::input;
use crate::state::AppState;

mod auth;
mod entity;

/// a terminal dashboard for the school administration api.
///
/// manages announcements, achievements, activities, student records and the
/// rest of the school content. if no command is provided then it will enter
/// interactive mode.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<BaseCmds>
}

pub async fn start() -> error::Result {
    let args = Cli::parse();
    let settings = Settings::load(&args.config)?;
    let state = AppState::from_settings(settings)?;

    match args.command {
        Some(cmd) => {
            if cmd.needs_session() {
                state.session.checking_session().await;
            }

            handle(&state, cmd).await
        }
        None => {
            state.session.checking_session().await;

            Interactive::handle(&state).await
        }
    }
}

#[derive(Debug, Parser)]
#[command(multicall = true)]
enum Interactive {
    #[command(flatten)]
    Base(BaseCmds),

    /// leaves interactive mode
    #[command(alias = "exit")]
    Quit
}

impl Interactive {
    async fn handle(state: &AppState) -> error::Result {
        loop {
            if state.relogin.take() || !state.session.is_authenticated() {
                if !auth::prompt_login(state).await? {
                    break;
                }
            }

            let Some(given) = input::read_stdin("> ")? else {
                break;
            };
            let trimmed = given.trim();

            if trimmed.is_empty() {
                continue;
            }

            let Ok(args_list) = shell_words::split(trimmed) else {
                println!("failed to parse command line args");
                continue;
            };

            let cmd = match Interactive::try_parse_from(args_list) {
                Ok(c) => c,
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            };

            let result = match cmd {
                Interactive::Base(cmd) => handle(state, cmd).await,
                Interactive::Quit => break,
            };

            if let Err(err) = result {
                println!("{}", err);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Subcommand)]
enum BaseCmds {
    /// logs in with an email and password
    Login(auth::LoginArgs),

    /// ends the current session
    Logout,

    /// shows who is logged in and what they can manage
    Status,

    /// asks the server to send a password reset link
    ForgotPassword(auth::ForgotArgs),

    /// sets a new password with a reset token
    ResetPassword(auth::ResetArgs),

    /// manages announcements
    #[command(alias = "pengumuman")]
    Announcements(entity::EntityArgs),

    /// manages achievement news
    #[command(alias = "berita")]
    Achievements(entity::EntityArgs),

    /// manages school activities
    #[command(alias = "kegiatan")]
    Activities(entity::EntityArgs),

    /// manages home page carousel slides
    Carousels(entity::EntityArgs),

    /// manages education levels
    #[command(alias = "jenjang")]
    Levels(entity::EntityArgs),

    /// manages student subject grades
    #[command(alias = "subject-grades")]
    Grades(entity::EntityArgs),

    /// manages social media links
    SocialMedia(entity::EntityArgs),

    /// manages graduation results
    Graduation(entity::EntityArgs),

    /// manages student records
    #[command(alias = "siswa")]
    Students(entity::EntityArgs),

    /// manages new student admissions
    #[command(alias = "pendaftaran")]
    Admissions(entity::EntityArgs),
}

impl BaseCmds {
    fn needs_session(&self) -> bool {
        !matches!(
            self,
            BaseCmds::Login(_) |
            BaseCmds::ForgotPassword(_) |
            BaseCmds::ResetPassword(_)
        )
    }
}

async fn handle(state: &AppState, command: BaseCmds) -> error::Result {
    match command {
        BaseCmds::Login(given) => auth::login(state, given).await,
        BaseCmds::Logout => auth::logout(state),
        BaseCmds::Status => auth::status(state),
        BaseCmds::ForgotPassword(given) => auth::forgot_password(state, given).await,
        BaseCmds::ResetPassword(given) => auth::reset_password(state, given).await,
        BaseCmds::Announcements(given) => entity::handle::<Announcements>(state, given).await,
        BaseCmds::Achievements(given) => entity::handle::<Achievements>(state, given).await,
        BaseCmds::Activities(given) => entity::handle::<Activities>(state, given).await,
        BaseCmds::Carousels(given) => entity::handle::<Carousels>(state, given).await,
        BaseCmds::Levels(given) => entity::handle::<Levels>(state, given).await,
        BaseCmds::Grades(given) => entity::handle::<SubjectGrades>(state, given).await,
        BaseCmds::SocialMedia(given) => entity::handle::<SocialMedias>(state, given).await,
        BaseCmds::Graduation(given) => entity::handle::<Graduations>(state, given).await,
        BaseCmds::Students(given) => entity::handle::<Students>(state, given).await,
        BaseCmds::Admissions(given) => entity::handle::<Admissions>(state, given).await,
    }
}
