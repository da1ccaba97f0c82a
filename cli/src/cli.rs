//! Command-line surface of the `catalog` binary.

use std::path::PathBuf;

use catalog_core::{BookInput, StudentInput};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "catalog", version, about = "Manage the book and student catalog over its REST API")]
pub struct Cli {
    /// API base URL, e.g. http://localhost:8080 (overrides configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work with books
    Books {
        #[command(subcommand)]
        action: BookAction,
    },
    /// Work with students
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum BookAction {
    /// List every book
    List,
    /// Show one book with its publication details
    Show { id: i64 },
    /// Add a new book
    Add(BookFields),
    /// Edit an existing book; omitted fields keep their current value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: BookFields,
    },
    /// Delete a book
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Find books by title
    Search { title: String },
}

#[derive(Debug, Subcommand)]
pub enum StudentAction {
    /// List every student
    List,
    /// Show one student
    Show { id: i64 },
    /// Add a new student
    Add(StudentFields),
    /// Edit an existing student; omitted fields keep their current value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: StudentFields,
    },
    /// Delete a student
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct BookFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,
    /// Publication date as YYYY-MM-DD
    #[arg(long)]
    pub publish_date: Option<String>,
}

impl BookFields {
    /// Supplied flags as `(wire field, raw text)`, in validation order.
    pub fn supplied(&self) -> Vec<(&'static str, String)> {
        [
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("isbn", self.isbn.clone()),
            ("price", self.price.map(|p| p.to_string())),
            ("publishDate", self.publish_date.clone()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }

    /// Copy every supplied field into `form`.
    pub fn apply(self, form: &mut BookInput) {
        if self.title.is_some() {
            form.title = self.title;
        }
        if self.author.is_some() {
            form.author = self.author;
        }
        if self.isbn.is_some() {
            form.isbn = self.isbn;
        }
        if self.price.is_some() {
            form.price = self.price;
        }
        if self.publish_date.is_some() {
            form.publish_date = self.publish_date;
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct StudentFields {
    #[arg(long)]
    pub name: Option<String>,
    /// One letter followed by five digits, e.g. A12345
    #[arg(long)]
    pub student_number: Option<String>,
    /// Date of birth as YYYY-MM-DD
    #[arg(long)]
    pub date_of_birth: Option<String>,
}

impl StudentFields {
    pub fn supplied(&self) -> Vec<(&'static str, String)> {
        [
            ("name", self.name.clone()),
            ("studentNumber", self.student_number.clone()),
            ("dateOfBirth", self.date_of_birth.clone()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }

    pub fn apply(self, form: &mut StudentInput) {
        if self.name.is_some() {
            form.name = self.name;
        }
        if self.student_number.is_some() {
            form.student_number = self.student_number;
        }
        if self.date_of_birth.is_some() {
            form.date_of_birth = self.date_of_birth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_book_add() {
        let cli = Cli::try_parse_from([
            "catalog",
            "books",
            "add",
            "--title",
            "Dune",
            "--author",
            "Frank Herbert",
            "--isbn",
            "1234567890",
            "--price",
            "18.5",
            "--publish-date",
            "1965-08-01",
        ])
        .unwrap();
        let Command::Books {
            action: BookAction::Add(fields),
        } = cli.command
        else {
            panic!("expected books add");
        };
        assert_eq!(fields.price, Some(18.5));
        assert_eq!(fields.publish_date.as_deref(), Some("1965-08-01"));
    }

    #[test]
    fn negative_price_reaches_the_validator() {
        let cli = Cli::try_parse_from(["catalog", "books", "add", "--price", "-1"]).unwrap();
        let Command::Books {
            action: BookAction::Add(fields),
        } = cli.command
        else {
            panic!("expected books add");
        };
        assert_eq!(fields.price, Some(-1.0));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "catalog",
            "students",
            "delete",
            "3",
            "--yes",
            "--base-url",
            "http://example.test",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://example.test"));
        assert!(matches!(
            cli.command,
            Command::Students {
                action: StudentAction::Delete { id: 3, yes: true }
            }
        ));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(Cli::try_parse_from(["catalog", "books", "show", "abc"]).is_err());
    }

    #[test]
    fn edit_only_overrides_given_fields() {
        let mut form = BookInput {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            isbn: Some("1234567890".to_string()),
            price: Some(18.5),
            publish_date: Some("1965-08-01".to_string()),
        };
        BookFields {
            price: Some(20.0),
            ..BookFields::default()
        }
        .apply(&mut form);
        assert_eq!(form.price, Some(20.0));
        assert_eq!(form.title.as_deref(), Some("Dune"));

        let mut student = StudentInput::default();
        StudentFields {
            student_number: Some("B54321".to_string()),
            ..StudentFields::default()
        }
        .apply(&mut student);
        assert_eq!(student.student_number.as_deref(), Some("B54321"));
        assert!(student.name.is_none());
    }

    #[test]
    fn supplied_lists_only_given_flags() {
        let fields = BookFields {
            isbn: Some("123".to_string()),
            price: Some(-2.5),
            ..BookFields::default()
        };
        assert_eq!(
            fields.supplied(),
            vec![("isbn", "123".to_string()), ("price", "-2.5".to_string())]
        );
        assert!(StudentFields::default().supplied().is_empty());
    }
}
