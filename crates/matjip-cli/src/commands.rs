use std::io::{self, Write};

use anyhow::{bail, Context, Result};

use matjip_core::auth::CredentialStore;
use matjip_core::models::{FoodCategory, Member};
use matjip_core::{RequestClient, RequestError, SessionStore};

use crate::format;

pub const USAGE: &str = "\
Usage:
  matjip login [email] [--remember]
  matjip logout
  matjip whoami
  matjip posts [--category <name> | --search <keyword> | --mine]
  matjip post <id>
  matjip like <post-id>
  matjip comment <post-id> <text>";

#[derive(Debug, Clone, PartialEq)]
pub enum PostFilter {
    All,
    Category(FoodCategory),
    Search(String),
    Mine,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: Option<String>, remember: bool },
    Logout,
    WhoAmI,
    Posts(PostFilter),
    Post(i64),
    Like(i64),
    Comment { post_id: i64, text: String },
}

fn parse_id(raw: Option<&String>, what: &str) -> Result<i64> {
    let raw = raw.with_context(|| format!("Missing {}", what))?;
    raw.parse()
        .with_context(|| format!("Invalid {}: {}", what, raw))
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some(name) = args.first() else {
            bail!("Missing command");
        };
        let rest = &args[1..];

        let command = match name.as_str() {
            "login" => Command::Login {
                email: rest.iter().find(|a| !a.starts_with("--")).cloned(),
                remember: rest.iter().any(|a| a == "--remember"),
            },
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "posts" => {
                let filter = match rest.first().map(String::as_str) {
                    None => PostFilter::All,
                    Some("--mine") => PostFilter::Mine,
                    Some("--category") => {
                        let raw = rest.get(1).context("Missing category name")?;
                        let category = FoodCategory::parse(raw)
                            .with_context(|| format!("Unknown category: {}", raw))?;
                        PostFilter::Category(category)
                    }
                    Some("--search") => {
                        let keyword = rest[1..].join(" ");
                        if keyword.trim().is_empty() {
                            bail!("Missing search keyword");
                        }
                        PostFilter::Search(keyword)
                    }
                    Some(other) => bail!("Unknown option: {}", other),
                };
                Command::Posts(filter)
            }
            "post" => Command::Post(parse_id(rest.first(), "post id")?),
            "like" => Command::Like(parse_id(rest.first(), "post id")?),
            "comment" => {
                let post_id = parse_id(rest.first(), "post id")?;
                let text = rest.get(1..).map(|t| t.join(" ")).unwrap_or_default();
                if text.trim().is_empty() {
                    bail!("Missing comment text");
                }
                Command::Comment { post_id, text }
            }
            other => bail!("Unknown command: {}", other),
        };
        Ok(command)
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Log in with the keychain password when one is saved. If the server turns
/// it down, the saved password is forgotten and the member is asked for a new
/// one. Returns the password that worked.
async fn login_with_saved_password(
    client: &RequestClient,
    email: &str,
    saved: Option<String>,
    forget: impl FnOnce() -> Result<()>,
    ask: impl FnOnce() -> Result<String>,
) -> Result<(Member, String)> {
    if let Some(saved) = saved {
        match client.login(email, &saved).await {
            Ok(member) => return Ok((member, saved)),
            Err(e) if is_bad_credentials(&e) => {
                eprintln!("Saved password was rejected.");
                forget()?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let password = ask()?;
    let member = client.login(email, &password).await?;
    Ok((member, password))
}

fn is_bad_credentials(err: &RequestError) -> bool {
    err.status().is_some_and(|status| status == 401)
}

fn require_member(client: &RequestClient) -> Result<i64> {
    match client.current_member_id() {
        Some(id) if client.session().is_authenticated() => Ok(id),
        _ => bail!("Not logged in. Run `matjip login` first."),
    }
}

pub async fn run(client: &RequestClient, command: Command) -> Result<()> {
    match command {
        Command::Login { email, remember } => {
            let email = match email {
                Some(email) => email,
                None => prompt("Email: ")?,
            };
            let (member, password) = login_with_saved_password(
                client,
                &email,
                CredentialStore::get_password(&email),
                || CredentialStore::delete(&email),
                || rpassword::prompt_password("Password: ").context("Failed to read password"),
            )
            .await?;
            if remember {
                CredentialStore::store(&email, &password)?;
            }
            println!("Welcome, {}!", member.nickname);
        }
        Command::Logout => {
            let session = client.session().get();
            client.logout();
            if let Some(email) = session.email {
                CredentialStore::delete(&email)?;
            }
            println!("Logged out.");
        }
        Command::WhoAmI => {
            let session = client.session().get();
            if !session.is_authenticated() {
                println!("Not logged in.");
            } else {
                println!(
                    "{} <{}> (member #{})",
                    session.nickname.as_deref().unwrap_or("?"),
                    session.email.as_deref().unwrap_or("no email"),
                    session.member_id.as_deref().unwrap_or("?")
                );
            }
        }
        Command::Posts(filter) => {
            let posts = match filter {
                PostFilter::All => client.fetch_posts().await?,
                PostFilter::Category(category) => client.fetch_posts_by_category(category).await?,
                PostFilter::Search(keyword) => client.search_posts(&keyword).await?,
                PostFilter::Mine => {
                    let member_id = require_member(client)?;
                    client.fetch_posts_by_member(member_id).await?
                }
            };
            if posts.is_empty() {
                println!("No posts.");
            }
            for post in &posts {
                println!("{}", format::post_line(post));
            }
        }
        Command::Post(post_id) => {
            let post = client.fetch_post(post_id).await?;
            let comments = client.fetch_comments(post_id).await?;

            println!("{}", format::post_line(&post));
            if let Some(ref name) = post.restaurant_name {
                println!("📍 {}", name);
            }
            if let Some(ref address) = post.restaurant_address {
                println!("   {}", address);
            }
            println!(
                "👁️ {}  ❤️ {}  💬 {}\n",
                post.view_count,
                post.like_count,
                comments.len()
            );
            println!("{}\n", post.content.as_deref().unwrap_or(""));
            for comment in comments.iter().filter(|c| !c.deleted) {
                let age = comment
                    .created_at
                    .as_deref()
                    .map(format::relative_to_now)
                    .unwrap_or_default();
                println!("  {} ({}): {}", comment.author_display(), age, comment.content);
            }
        }
        Command::Like(post_id) => {
            require_member(client)?;
            let liked = client.toggle_post_like(post_id).await?;
            let status = client.fetch_post_like_status(post_id).await?;
            println!(
                "{} post #{} ({} likes)",
                if liked { "Liked" } else { "Unliked" },
                post_id,
                status.like_count
            );
        }
        Command::Comment { post_id, text } => {
            require_member(client)?;
            let comment = client.create_comment(post_id, &text).await?;
            println!("Comment #{} added to post #{}.", comment.id, post_id);
        }
    }
    Ok(())
}
