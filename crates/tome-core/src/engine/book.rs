//! Book commands: show, buy, select, modify, import.
//!
//! ## The select → modify/import Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  select 978-0          binds alice → 978-0 (creates a blank book)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  modify -name="Dune" -price=12.50                                       │
//! │       │   every flag validated first, then applied together            │
//! │       ▼                                                                 │
//! │  modify -ISBN=978-1    book moves to 978-1, binding follows             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  import 10 80.00       stock +10, expense 80.00                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use super::{check_arity, Applied, Bookstore, Response};
use crate::error::{CommandError, CommandResult};
use crate::money::Money;
use crate::report::book_row;
use crate::types::{Book, Privilege, Transaction};
use crate::validation::{
    is_nonzero_amount, parse_price, parse_quantity, unquote, validate_book_text, validate_isbn,
    validate_keywords, validate_single_keyword,
};

// =============================================================================
// Flags
// =============================================================================

/// The `-key=value` arguments of `show` and `modify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Isbn,
    Name,
    Author,
    Keyword,
    Price,
}

impl Field {
    const fn key(self) -> &'static str {
        match self {
            Field::Isbn => "ISBN",
            Field::Name => "name",
            Field::Author => "author",
            Field::Keyword => "keyword",
            Field::Price => "price",
        }
    }
}

/// Splits `-key=value` into its field and raw value.
fn split_flag(token: &str) -> CommandResult<(Field, &str)> {
    let unknown = || CommandError::UnknownFlag(token.to_string());

    let (key, value) = token
        .strip_prefix('-')
        .and_then(|rest| rest.split_once('='))
        .ok_or_else(unknown)?;

    let field = match key {
        "ISBN" => Field::Isbn,
        "name" => Field::Name,
        "author" => Field::Author,
        "keyword" => Field::Keyword,
        "price" => Field::Price,
        _ => return Err(unknown()),
    };

    Ok((field, value))
}

/// Unquotes and validates a name or author value.
fn quoted_text(field: &'static str, raw: &str) -> CommandResult<String> {
    let text = unquote(field, raw)?;
    validate_book_text(field, text)?;
    Ok(text.to_string())
}

// =============================================================================
// Show Filter
// =============================================================================

/// The optional single filter of `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BookFilter {
    All,
    Isbn(String),
    Name(String),
    Author(String),
    Keyword(String),
}

impl BookFilter {
    fn parse(token: Option<&String>) -> CommandResult<BookFilter> {
        let Some(token) = token else {
            return Ok(BookFilter::All);
        };

        let (field, raw) = split_flag(token)?;
        match field {
            Field::Isbn => {
                validate_isbn(raw)?;
                Ok(BookFilter::Isbn(raw.to_string()))
            }
            Field::Name => Ok(BookFilter::Name(quoted_text("name", raw)?)),
            Field::Author => Ok(BookFilter::Author(quoted_text("author", raw)?)),
            Field::Keyword => {
                let keyword = unquote("keyword", raw)?;
                validate_single_keyword(keyword)?;
                Ok(BookFilter::Keyword(keyword.to_string()))
            }
            Field::Price => Err(CommandError::UnknownFlag(token.clone())),
        }
    }

    fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Isbn(isbn) => book.isbn == *isbn,
            BookFilter::Name(name) => book.name == *name,
            BookFilter::Author(author) => book.author == *author,
            BookFilter::Keyword(keyword) => book.has_keyword(keyword),
        }
    }
}

// =============================================================================
// Modify Edit
// =============================================================================

/// Validated field updates of one `modify`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct BookEdit {
    isbn: Option<String>,
    name: Option<String>,
    author: Option<String>,
    keywords: Option<String>,
    price: Option<Money>,
}

impl BookEdit {
    /// Parses every flag, rejecting unknown or repeated ones.
    fn parse(flags: &[String]) -> CommandResult<BookEdit> {
        let mut edit = BookEdit::default();

        for token in flags {
            let (field, raw) = split_flag(token)?;
            let repeated = match field {
                Field::Isbn => edit.isbn.is_some(),
                Field::Name => edit.name.is_some(),
                Field::Author => edit.author.is_some(),
                Field::Keyword => edit.keywords.is_some(),
                Field::Price => edit.price.is_some(),
            };
            if repeated {
                return Err(CommandError::RepeatedFlag(field.key()));
            }

            match field {
                Field::Isbn => {
                    validate_isbn(raw)?;
                    edit.isbn = Some(raw.to_string());
                }
                Field::Name => edit.name = Some(quoted_text("name", raw)?),
                Field::Author => edit.author = Some(quoted_text("author", raw)?),
                Field::Keyword => {
                    let keywords = unquote("keyword", raw)?;
                    validate_keywords(keywords)?;
                    edit.keywords = Some(keywords.to_string());
                }
                Field::Price => edit.price = Some(parse_price(raw)?),
            }
        }

        Ok(edit)
    }

    /// Writes the edit into `book`. The ISBN is moved last.
    fn apply(self, book: &mut Book) {
        if let Some(name) = self.name {
            book.name = name;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(keywords) = self.keywords {
            book.keywords = keywords;
        }
        if let Some(price) = self.price {
            book.price = price;
        }
        if let Some(isbn) = self.isbn {
            book.isbn = isbn;
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

impl Bookstore {
    /// `show [-ISBN=x | -name="x" | -author="x" | -keyword="x"]`
    pub(super) fn show(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("show", tokens, 1, 2)?;
        let filter = BookFilter::parse(tokens.get(1))?;

        self.require(Privilege::Customer)?;

        let rows: Vec<String> = self
            .store
            .books()
            .filter(|book| filter.matches(book))
            .map(book_row)
            .collect();

        let response = if rows.is_empty() {
            Response::blank()
        } else {
            Response::lines(rows)
        };
        Ok(Applied::new(response, ""))
    }

    /// `buy <ISBN> <quantity>`
    pub(super) fn buy(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("buy", tokens, 3, 3)?;

        let isbn = &tokens[1];
        validate_isbn(isbn)?;
        let quantity = parse_quantity(&tokens[2])?;

        self.require(Privilege::Customer)?;

        let book = self
            .store
            .book_mut(isbn)
            .ok_or_else(|| CommandError::BookNotFound(isbn.clone()))?;
        if !book.can_sell(quantity) {
            return Err(CommandError::InsufficientStock {
                isbn: isbn.clone(),
                available: book.quantity,
                requested: quantity,
            });
        }
        let total = book
            .price
            .checked_mul_quantity(quantity)
            .ok_or(CommandError::Overflow)?;

        book.quantity -= quantity;
        self.store.push_transaction(Transaction::income(total));

        Ok(Applied::new(
            Response::line(total.to_string()),
            format!("{} {}", isbn, tokens[2]),
        ))
    }

    /// `select <ISBN>`
    pub(super) fn select(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("select", tokens, 2, 2)?;

        let isbn = &tokens[1];
        validate_isbn(isbn)?;

        self.require(Privilege::Staff)?;
        let user_id = self.current_user()?.to_string();

        if !self.store.contains_book(isbn) {
            self.store.insert_book(Book::blank(isbn.as_str()));
        }
        self.selections.select(user_id, isbn.as_str());

        Ok(Applied::silent(isbn.clone()))
    }

    /// `modify (-ISBN=x | -name="x" | -author="x" | -keyword="x|y" | -price=x)+`
    pub(super) fn modify(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("modify", tokens, 2, usize::MAX)?;
        let edit = BookEdit::parse(&tokens[1..])?;

        self.require(Privilege::Staff)?;
        let user_id = self.current_user()?.to_string();

        let selected = self
            .selections
            .current(&user_id)
            .ok_or(CommandError::NoSelection)?
            .to_string();
        let mut book = self
            .store
            .book(&selected)
            .cloned()
            .ok_or_else(|| CommandError::BookNotFound(selected.clone()))?;

        if let Some(new_isbn) = &edit.isbn {
            if *new_isbn == selected || self.store.contains_book(new_isbn) {
                return Err(CommandError::IsbnUnavailable(new_isbn.clone()));
            }
        }

        edit.apply(&mut book);
        if book.isbn != selected {
            self.store.remove_book(&selected);
            self.selections.select(user_id, book.isbn.as_str());
        }
        self.store.insert_book(book);

        Ok(Applied::silent(""))
    }

    /// `import <quantity> <total-cost>`
    ///
    /// The cost must be written as a positive number; the expense recorded is
    /// that number rounded to cents, so `import 5 0.001` records `0.00`.
    pub(super) fn import(&mut self, tokens: &[String]) -> CommandResult<Applied> {
        check_arity("import", tokens, 3, 3)?;

        let quantity = parse_quantity(&tokens[1])?;
        let cost = parse_price(&tokens[2])?;

        self.require(Privilege::Staff)?;
        let user_id = self.current_user()?;

        let selected = self
            .selections
            .current(user_id)
            .ok_or(CommandError::NoSelection)?
            .to_string();
        if !is_nonzero_amount(&tokens[2]) {
            return Err(CommandError::NonPositiveCost);
        }
        let book = self
            .store
            .book_mut(&selected)
            .ok_or_else(|| CommandError::BookNotFound(selected.clone()))?;
        let stock = book
            .quantity
            .checked_add(quantity)
            .ok_or(CommandError::Overflow)?;

        book.quantity = stock;
        self.store.push_transaction(Transaction::expense(cost));

        Ok(Applied::silent(format!("{} {}", tokens[1], tokens[2])))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
