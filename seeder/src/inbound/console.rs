//! Console rendering of a seed run.
//!
//! Writes the human-readable status lines and the user listing. Progress
//! while waiting for the database goes through `tracing`, not here.

use std::io::{self, Write};

use crate::domain::{InsertOutcome, SeedSummary, User};

const NULL_COLUMN: &str = "NULL";

/// Format one stored user as `{id} — {name} ({email})`. NULL columns are
/// shown as `NULL`.
///
/// # Examples
/// ```
/// use seeder::domain::{User, UserId};
/// use seeder::inbound::console::format_user;
///
/// let user = User::new(
///     UserId::new(1),
///     Some("Alice".to_owned()),
///     Some("alice@example.com".to_owned()),
/// );
/// assert_eq!(format_user(&user), "1 — Alice (alice@example.com)");
/// ```
pub fn format_user(user: &User) -> String {
    format!(
        "{} — {} ({})",
        user.id(),
        user.name().unwrap_or(NULL_COLUMN),
        user.email().unwrap_or(NULL_COLUMN)
    )
}

/// Write the full run summary to `out`.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_summary(out: &mut impl Write, summary: &SeedSummary) -> io::Result<()> {
    writeln!(
        out,
        "Connected to PostgreSQL after {} attempt(s).",
        summary.attempts
    )?;
    match summary.report.outcome {
        InsertOutcome::Inserted(id) => writeln!(out, "New user inserted with id = {id}")?,
        InsertOutcome::AlreadyExists => writeln!(out, "User already exists, skipping insert.")?,
    }
    writeln!(out)?;
    writeln!(out, "Users in database:")?;
    for user in &summary.report.users {
        writeln!(out, "{}", format_user(user))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    //! Output format coverage for the console renderer.
    use std::time::Duration;

    use super::*;
    use crate::domain::{NewUser, SeedReport, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn alice() -> User {
        let candidate =
            NewUser::try_from_strings("Alice", "alice@example.com").expect("valid candidate");
        User::from_candidate(UserId::new(1), &candidate)
    }

    fn render(summary: &SeedSummary) -> String {
        let mut buffer = Vec::new();
        write_summary(&mut buffer, summary).expect("writing to a Vec succeeds");
        String::from_utf8(buffer).expect("output is UTF-8")
    }

    #[rstest]
    fn fresh_insert_is_reported_with_its_id(alice: User) {
        let summary = SeedSummary {
            attempts: 3,
            waited: Duration::from_secs(6),
            report: SeedReport {
                outcome: InsertOutcome::Inserted(UserId::new(1)),
                users: vec![alice],
            },
        };

        assert_eq!(
            render(&summary),
            concat!(
                "Connected to PostgreSQL after 3 attempt(s).\n",
                "New user inserted with id = 1\n",
                "\n",
                "Users in database:\n",
                "1 — Alice (alice@example.com)\n",
            )
        );
    }

    #[rstest]
    fn existing_user_is_reported_without_an_id(alice: User) {
        let summary = SeedSummary {
            attempts: 1,
            waited: Duration::ZERO,
            report: SeedReport {
                outcome: InsertOutcome::AlreadyExists,
                users: vec![alice],
            },
        };

        let output = render(&summary);

        assert!(output.contains("User already exists, skipping insert.\n"));
        assert!(!output.contains("id ="));
        assert!(output.ends_with("1 — Alice (alice@example.com)\n"));
    }

    #[rstest]
    fn null_columns_are_rendered_as_null() {
        let user = User::new(UserId::new(2), None, Some("x@example.com".to_owned()));

        assert_eq!(format_user(&user), "2 — NULL (x@example.com)");
    }
}
