//! Flat file-backed document stores.
//!
//! Each collection is one JSON document per line, loaded fully into memory at
//! startup. Appends go straight to disk; upserts rewrite the file from the
//! in-memory snapshot. The four collections are independent: nothing
//! coordinates a write in one with a write in another.

pub mod records;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::shared::errors::StorageError;
use self::records::{DepositRecord, ProfitRecord, TransactionRecord, WithdrawalRecord};

/// A single file-backed collection.
pub struct Collection<T> {
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Load the whole collection into memory. A missing file is an empty
    /// collection; it is created on first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let mut records = Vec::new();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                    let record: T =
                        serde_json::from_str(line).map_err(|source| StorageError::Corrupt {
                            path: path.display().to_string(),
                            source,
                        })?;
                    records.push(record);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::Io(e)),
        }
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Append one record: disk first, then memory, so a failed write leaves
    /// the in-memory view unchanged.
    pub async fn append(&self, record: T) -> Result<(), StorageError> {
        let mut guard = self.records.write().await;
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        guard.push(record);
        Ok(())
    }

    /// Replace-or-insert the record matching the predicate, rewriting the
    /// whole backing file. Full-document replace, not a merge.
    pub async fn upsert<F>(&self, record: T, matches: F) -> Result<(), StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let mut guard = self.records.write().await;
        let mut updated = guard.clone();
        match updated.iter_mut().find(|r| matches(r)) {
            Some(existing) => *existing = record,
            None => updated.push(record),
        }

        let mut contents = String::new();
        for record in &updated {
            contents.push_str(&serde_json::to_string(record)?);
            contents.push('\n');
        }
        tokio::fs::write(&self.path, contents).await?;

        *guard = updated;
        Ok(())
    }

    /// Snapshot of every record matching the predicate.
    pub async fn find<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

/// Per-user profit balances, keyed uniquely by user id.
pub struct ProfitsStore {
    inner: Collection<ProfitRecord>,
}

impl ProfitsStore {
    pub async fn find_by_user(&self, user_id: &str) -> Option<ProfitRecord> {
        self.inner
            .find(|r| r.user_id == user_id)
            .await
            .into_iter()
            .next()
    }

    pub async fn upsert(&self, record: ProfitRecord) -> Result<(), StorageError> {
        let user_id = record.user_id.clone();
        self.inner.upsert(record, |r| r.user_id == user_id).await
    }
}

/// Append-only ledger of every mutating operation.
pub struct TransactionsStore {
    inner: Collection<TransactionRecord>,
}

impl TransactionsStore {
    pub async fn append(&self, record: TransactionRecord) -> Result<(), StorageError> {
        self.inner.append(record).await
    }

    /// Newest first.
    pub async fn list_by_user(&self, user_id: &str) -> Vec<TransactionRecord> {
        let mut records = self.inner.find(|r| r.user_id == user_id).await;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }
}

/// Append-only withdrawal requests.
pub struct WithdrawalsStore {
    inner: Collection<WithdrawalRecord>,
}

impl WithdrawalsStore {
    pub async fn append(&self, record: WithdrawalRecord) -> Result<(), StorageError> {
        self.inner.append(record).await
    }

    /// Newest first. No endpoint reads withdrawals yet; kept for parity with
    /// the other append-only stores.
    #[allow(dead_code)]
    pub async fn list_by_user(&self, user_id: &str) -> Vec<WithdrawalRecord> {
        let mut records = self.inner.find(|r| r.user_id == user_id).await;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }
}

/// Append-only admin-entered deposits.
pub struct DepositsStore {
    inner: Collection<DepositRecord>,
}

impl DepositsStore {
    pub async fn append(&self, record: DepositRecord) -> Result<(), StorageError> {
        self.inner.append(record).await
    }

    /// Newest first.
    pub async fn list_by_user(&self, user_id: &str) -> Vec<DepositRecord> {
        let mut records = self.inner.find(|r| r.user_id == user_id).await;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }
}

/// The four dashboard collections.
pub struct Stores {
    pub profits: ProfitsStore,
    pub transactions: TransactionsStore,
    pub withdrawals: WithdrawalsStore,
    pub deposits: DepositsStore,
}

impl Stores {
    /// Open every collection under `data_dir`, creating the directory when
    /// missing.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            profits: ProfitsStore {
                inner: Collection::open(data_dir.join("profits.db"))?,
            },
            transactions: TransactionsStore {
                inner: Collection::open(data_dir.join("transactions.db"))?,
            },
            withdrawals: WithdrawalsStore {
                inner: Collection::open(data_dir.join("withdrawals.db"))?,
            },
            deposits: DepositsStore {
                inner: Collection::open(data_dir.join("deposits.db"))?,
            },
        })
    }
}
