//! # Book Repository
//!
//! Persists [`Book`] records, keyed by ISBN. Prices are stored in cents.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tome_core::{Book, Money};

/// One `books` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRecord {
    pub isbn: String,
    pub name: String,
    pub author: String,
    pub keywords: String,
    pub price_cents: i64,
    pub quantity: i64,
}

impl TryFrom<BookRecord> for Book {
    type Error = DbError;

    fn try_from(row: BookRecord) -> DbResult<Book> {
        if row.quantity < 0 || row.price_cents < 0 {
            return Err(DbError::corrupt("books", format!("negative value for {}", row.isbn)));
        }

        Ok(Book {
            isbn: row.isbn,
            name: row.name,
            author: row.author,
            keywords: row.keywords,
            price: Money::from_cents(i128::from(row.price_cents)),
            quantity: row.quantity,
        })
    }
}

/// Repository for book rows.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// All books, ordered by ISBN.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRecord>(
            r#"
            SELECT isbn, name, author, keywords, price_cents, quantity
            FROM books
            ORDER BY isbn
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Book::try_from).collect()
    }

    /// Replaces every book row inside the caller's transaction.
    pub(crate) async fn replace_all(conn: &mut SqliteConnection, books: &[Book]) -> DbResult<()> {
        debug!(count = books.len(), "Writing books");

        sqlx::query("DELETE FROM books").execute(&mut *conn).await?;

        for book in books {
            let price_cents = i64::try_from(book.price.cents()).map_err(|_| {
                DbError::corrupt("books", format!("price {} of {} out of range", book.price, book.isbn))
            })?;

            sqlx::query(
                r#"
                INSERT INTO books (isbn, name, author, keywords, price_cents, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&book.isbn)
            .bind(&book.name)
            .bind(&book.author)
            .bind(&book.keywords)
            .bind(price_cents)
            .bind(book.quantity)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
