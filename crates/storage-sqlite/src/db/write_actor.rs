//! Single-writer actor.
//!
//! SQLite allows one writer at a time, so every write job is sent to a
//! dedicated thread that owns one pooled connection and runs each job inside
//! its own transaction.

use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use log::{debug, error};
use tokio::sync::{mpsc, oneshot};

use btmirror_core::{Error, Result};

use super::DbPool;
use crate::errors::StorageError;

type Job = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

/// Carries either a domain error raised inside a job or the diesel error that
/// ended the transaction.
enum TxError {
    App(Error),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Diesel(err)
    }
}

impl From<TxError> for Error {
    fn from(err: TxError) -> Self {
        match err {
            TxError::App(err) => err,
            TxError::Diesel(err) => StorageError::from(err).into(),
        }
    }
}

#[derive(Clone)]
pub struct WriteHandle {
    sender: mpsc::UnboundedSender<Job>,
}

impl WriteHandle {
    /// Runs `job` on the writer thread inside a transaction. The transaction is
    /// rolled back when `job` returns an error.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let wrapped: Job = Box::new(move |conn: &mut SqliteConnection| {
            let result = conn
                .transaction::<T, TxError, _>(|tx| job(tx).map_err(TxError::App))
                .map_err(Error::from);
            if reply_tx.send(result).is_err() {
                debug!("Write job caller went away before the reply was sent");
            }
        });

        self.sender
            .send(wrapped)
            .map_err(|_| StorageError::Writer("writer thread has stopped".to_string()))?;
        reply_rx
            .await
            .map_err(|_| StorageError::Writer("writer dropped the job".to_string()))?
    }
}

/// Starts the writer thread. It exits once every `WriteHandle` is dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

    std::thread::Builder::new()
        .name("btmirror-db-writer".to_string())
        .spawn(move || {
            let mut conn = match pool.get() {
                Ok(conn) => conn,
                Err(err) => {
                    error!("Writer could not acquire a connection: {}", err);
                    return;
                }
            };
            while let Some(job) = receiver.blocking_recv() {
                job(&mut *conn);
            }
            debug!("Database writer stopped");
        })
        .map(|_| ())
        .unwrap_or_else(|err| error!("Failed to spawn database writer: {}", err));

    WriteHandle { sender }
}
