//! `circle`: command-line client for the Circle API.
//!
//! # Usage
//!
//! ```
//! circle --url http://localhost:5000 login --email alice@example.com
//! circle posts list
//! circle profile set --handle alice --status Developer --skills rust,sql
//! circle logout
//! ```

mod client;
mod session;

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use circle_core::{
  form::{EducationForm, ExperienceForm, LoginForm, ProfileForm, RegisterForm},
  post::Post,
  profile::ProfileView,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::ApiClient;
use serde::Deserialize;
use session::{Loaded, SessionCache};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "circle", about = "Command-line client for the Circle API")]
struct Args {
  /// Path to a TOML config file (url, session).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the circle server (default: http://localhost:5000).
  #[arg(long, env = "CIRCLE_URL")]
  url: Option<String>,

  /// Where the session token is kept (default: ~/.config/circle/session.toml).
  #[arg(long, env = "CIRCLE_SESSION", value_name = "FILE")]
  session: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account.
  Register {
    #[arg(long)]
    name:     String,
    #[arg(long)]
    email:    String,
    /// Read from stdin when omitted.
    #[arg(long)]
    password: Option<String>,
  },
  /// Log in and remember the session.
  Login {
    #[arg(long)]
    email:    String,
    /// Read from stdin when omitted.
    #[arg(long)]
    password: Option<String>,
  },
  /// Forget the stored session.
  Logout,
  /// Show the logged-in account.
  Whoami,
  #[command(subcommand)]
  Posts(PostsCommand),
  #[command(subcommand)]
  Profile(ProfileCommand),
}

#[derive(Subcommand, Debug)]
enum PostsCommand {
  /// All posts, newest first.
  List,
  Show { id: Uuid },
  Create { text: String },
  Delete { id: Uuid },
  Like { id: Uuid },
  Unlike { id: Uuid },
  Comment { id: Uuid, text: String },
  /// Delete one of your comments.
  Uncomment { id: Uuid, comment_id: Uuid },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
  /// Your own profile.
  Me,
  Handle { handle: String },
  User { user_id: Uuid },
  All,
  /// Create or update your profile.
  Set(ProfileArgs),
  AddExperience(ExperienceArgs),
  AddEducation(EducationArgs),
  RemoveExperience { id: Uuid },
  RemoveEducation { id: Uuid },
  /// Delete your profile and your account.
  Delete {
    #[arg(long)]
    yes: bool,
  },
}

#[derive(ClapArgs, Debug)]
struct ProfileArgs {
  #[arg(long)]
  handle:          String,
  #[arg(long)]
  status:          String,
  /// Comma-separated.
  #[arg(long)]
  skills:          String,
  #[arg(long)]
  company:         Option<String>,
  #[arg(long)]
  website:         Option<String>,
  #[arg(long)]
  location:        Option<String>,
  #[arg(long)]
  bio:             Option<String>,
  #[arg(long)]
  github_username: Option<String>,
  #[arg(long)]
  youtube:         Option<String>,
  #[arg(long)]
  twitter:         Option<String>,
  #[arg(long)]
  facebook:        Option<String>,
  #[arg(long)]
  linkedin:        Option<String>,
  #[arg(long)]
  instagram:       Option<String>,
}

impl From<ProfileArgs> for ProfileForm {
  fn from(a: ProfileArgs) -> Self {
    ProfileForm {
      handle:          Some(a.handle),
      status:          Some(a.status),
      skills:          Some(a.skills),
      company:         a.company,
      website:         a.website,
      location:        a.location,
      bio:             a.bio,
      github_username: a.github_username,
      youtube:         a.youtube,
      twitter:         a.twitter,
      facebook:        a.facebook,
      linkedin:        a.linkedin,
      instagram:       a.instagram,
    }
  }
}

#[derive(ClapArgs, Debug)]
struct ExperienceArgs {
  #[arg(long)]
  title:       String,
  #[arg(long)]
  company:     String,
  #[arg(long)]
  location:    Option<String>,
  /// YYYY-MM-DD.
  #[arg(long)]
  from:        String,
  #[arg(long)]
  to:          Option<String>,
  #[arg(long)]
  current:     bool,
  #[arg(long)]
  description: Option<String>,
}

impl From<ExperienceArgs> for ExperienceForm {
  fn from(a: ExperienceArgs) -> Self {
    ExperienceForm {
      title:       Some(a.title),
      company:     Some(a.company),
      location:    a.location,
      from:        Some(a.from),
      to:          a.to,
      current:     a.current,
      description: a.description,
    }
  }
}

#[derive(ClapArgs, Debug)]
struct EducationArgs {
  #[arg(long)]
  school:         String,
  #[arg(long)]
  degree:         String,
  #[arg(long)]
  field_of_study: String,
  /// YYYY-MM-DD.
  #[arg(long)]
  from:           String,
  #[arg(long)]
  to:             Option<String>,
  #[arg(long)]
  current:        bool,
  #[arg(long)]
  description:    Option<String>,
}

impl From<EducationArgs> for EducationForm {
  fn from(a: EducationArgs) -> Self {
    EducationForm {
      school:         Some(a.school),
      degree:         Some(a.degree),
      field_of_study: Some(a.field_of_study),
      from:           Some(a.from),
      to:             a.to,
      current:        a.current,
      description:    a.description,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  session: Option<PathBuf>,
}

fn default_session_path() -> PathBuf {
  match std::env::var("HOME") {
    Ok(home) => PathBuf::from(home).join(".config/circle/session.toml"),
    Err(_) => PathBuf::from("circle-session.toml"),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:5000".to_string());
  let session_path = args
    .session
    .or(file_cfg.session)
    .unwrap_or_else(default_session_path);

  let (mut session, loaded) = SessionCache::init(session_path, Utc::now())?;
  match loaded {
    Loaded::Active(claims) => tracing::debug!(user = %claims.id, "resuming session"),
    Loaded::Discarded => {
      eprintln!("Your session has expired. Please log in again with `circle login`.")
    }
    Loaded::Empty => {}
  }
  let client = ApiClient::new(&base_url, session.token().map(str::to_owned))?;

  match args.command {
    Command::Register { name, email, password } => {
      let password = match password {
        Some(p) => p,
        None => read_secret("Password: ")?,
      };
      let password2 = read_secret_or("Confirm password: ", &password)?;
      let user = client
        .register(&RegisterForm {
          name:      Some(name),
          email:     Some(email),
          password:  Some(password),
          password2: Some(password2),
        })
        .await?;
      println!("Registered {} <{}>. Log in with `circle login`.", user.name, user.email);
    }

    Command::Login { email, password } => {
      let password = match password {
        Some(p) => p,
        None => read_secret("Password: ")?,
      };
      let token = client
        .login(&LoginForm { email: Some(email), password: Some(password) })
        .await?;
      let claims = session.store(token)?;
      let expires = claims
        .expires_at()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| claims.exp.to_string());
      println!("Logged in as {} (session expires {expires}).", claims.name);
    }

    Command::Logout => {
      session.clear()?;
      println!("Logged out.");
    }

    Command::Whoami => {
      require_login(&session)?;
      let me = client.current_user().await?;
      println!("{} <{}>", me.name, me.email);
      println!("  id:     {}", me.id);
      println!("  avatar: {}", me.avatar);
      if let Some(exp) = session.claims().and_then(|c| c.expires_at()) {
        println!("  session expires {}", exp.to_rfc3339());
      }
    }

    Command::Posts(cmd) => run_posts(&client, &session, cmd).await?,
    Command::Profile(cmd) => run_profile(&client, &mut session, cmd).await?,
  }

  Ok(())
}

async fn run_posts(client: &ApiClient, session: &SessionCache, cmd: PostsCommand) -> Result<()> {
  if !matches!(cmd, PostsCommand::List | PostsCommand::Show { .. }) {
    require_login(session)?;
  }
  match cmd {
    PostsCommand::List => {
      let posts = client.list_posts().await?;
      if posts.is_empty() {
        println!("No posts yet.");
      }
      for post in &posts {
        print_post_line(post);
      }
    }
    PostsCommand::Show { id } => print_post(&client.get_post(id).await?),
    PostsCommand::Create { text } => print_post(&client.create_post(text).await?),
    PostsCommand::Delete { id } => {
      client.delete_post(id).await?;
      println!("Deleted post {id}.");
    }
    PostsCommand::Like { id } => print_post(&client.like(id).await?),
    PostsCommand::Unlike { id } => print_post(&client.unlike(id).await?),
    PostsCommand::Comment { id, text } => print_post(&client.comment(id, text).await?),
    PostsCommand::Uncomment { id, comment_id } => {
      print_post(&client.uncomment(id, comment_id).await?)
    }
  }
  Ok(())
}

async fn run_profile(
  client: &ApiClient,
  session: &mut SessionCache,
  cmd: ProfileCommand,
) -> Result<()> {
  let view = match cmd {
    ProfileCommand::Handle { handle } => client.profile_by_handle(&handle).await?,
    ProfileCommand::User { user_id } => client.profile_by_user(user_id).await?,
    ProfileCommand::All => {
      for view in client.all_profiles().await? {
        println!("{:<20} {:<24} {}", view.profile.handle, view.profile.status, display_name(&view));
      }
      return Ok(());
    }
    ProfileCommand::Me => {
      require_login(session)?;
      client.my_profile().await?
    }
    ProfileCommand::Set(profile) => {
      require_login(session)?;
      client.upsert_profile(&profile.into()).await?
    }
    ProfileCommand::AddExperience(entry) => {
      require_login(session)?;
      client.add_experience(&entry.into()).await?
    }
    ProfileCommand::AddEducation(entry) => {
      require_login(session)?;
      client.add_education(&entry.into()).await?
    }
    ProfileCommand::RemoveExperience { id } => {
      require_login(session)?;
      client.remove_experience(id).await?
    }
    ProfileCommand::RemoveEducation { id } => {
      require_login(session)?;
      client.remove_education(id).await?
    }
    ProfileCommand::Delete { yes } => {
      require_login(session)?;
      if !yes {
        bail!("this deletes your profile and your account; pass --yes to confirm");
      }
      client.delete_account().await?;
      session.clear()?;
      println!("Account deleted.");
      return Ok(());
    }
  };
  print_profile(&view);
  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn require_login(session: &SessionCache) -> Result<()> {
  if session.token().is_none() {
    bail!(
      "not logged in (no session at {}); run `circle login` first",
      session.path().display()
    );
  }
  Ok(())
}

/// Read a secret line from stdin.
fn read_secret(prompt: &str) -> Result<String> {
  let stdin = io::stdin();
  eprint!("{prompt}");
  io::stderr().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line).context("reading from stdin")?;
  Ok(line.trim_end_matches('\n').trim_end_matches('\r').to_string())
}

/// Prompt for a confirmation only when stdin is interactive; otherwise reuse
/// `fallback`.
fn read_secret_or(prompt: &str, fallback: &str) -> Result<String> {
  use std::io::IsTerminal as _;
  if io::stdin().is_terminal() { read_secret(prompt) } else { Ok(fallback.to_string()) }
}

fn display_name(view: &ProfileView) -> &str {
  view.user.as_ref().map(|u| u.name.as_str()).unwrap_or("(deleted user)")
}

fn print_post_line(post: &Post) {
  println!(
    "{}  {:<16} {:>3} likes {:>3} comments  {}",
    post.post_id,
    post.name,
    post.likes.len(),
    post.comments.len(),
    post.text.lines().next().unwrap_or_default()
  );
}

fn print_post(post: &Post) {
  println!("{} by {} at {}", post.post_id, post.name, post.created_at.to_rfc3339());
  println!("  {}", post.text);
  println!("  likes: {}", post.likes.len());
  for comment in post.comments.iter() {
    println!("  - [{}] {}: {}", comment.comment_id, comment.name, comment.text);
  }
}

fn print_profile(view: &ProfileView) {
  let p = &view.profile;
  println!("@{} ({})", p.handle, display_name(view));
  println!("  status:   {}", p.status);
  println!("  skills:   {}", p.skills.join(", "));
  for (label, value) in [
    ("company", &p.company),
    ("website", &p.website),
    ("location", &p.location),
    ("bio", &p.bio),
    ("github", &p.github_username),
  ] {
    if let Some(value) = value {
      println!("  {label:<9} {value}");
    }
  }
  if !p.experience.is_empty() {
    println!("  experience:");
    for e in p.experience.iter() {
      let until = e.to.map(|d| d.to_string()).unwrap_or_else(|| "now".to_string());
      println!("    [{}] {} at {} ({} to {until})", e.experience_id, e.title, e.company, e.from);
    }
  }
  if !p.education.is_empty() {
    println!("  education:");
    for e in p.education.iter() {
      let until = e.to.map(|d| d.to_string()).unwrap_or_else(|| "now".to_string());
      println!(
        "    [{}] {} in {}, {} ({} to {until})",
        e.education_id, e.degree, e.field_of_study, e.school, e.from
      );
    }
  }
}
