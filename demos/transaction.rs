use json_kv::{Error, JsonKv};

#[derive(Debug)]
enum BankError {
    Store(Error),
    Insufficient(String),
}

impl From<Error> for BankError {
    fn from(err: Error) -> Self {
        BankError::Store(err)
    }
}

fn transfer(db: &JsonKv<i64>, from: &str, to: &str, amount: i64) -> Result<(), BankError> {
    db.transaction(|tx| {
        let balance = tx.get(from).unwrap_or(0);
        if balance < amount {
            return Err(BankError::Insufficient(from.to_string()));
        }
        let other = tx.get(to).unwrap_or(0);
        tx.set(from, balance - amount);
        tx.set(to, other + amount);
        Ok(())
    })
}

fn main() -> Result<(), BankError> {
    let path = std::env::temp_dir().join("json_kv_example_transaction.json");
    let _ = std::fs::remove_file(&path);
    let db = JsonKv::<i64>::open(&path)?;
    db.extend([("alice", 100), ("bob", 20)])?;

    transfer(&db, "alice", "bob", 30)?;
    println!("after transfer: {:?}", db.get_all());

    // the whole batch is thrown away, nothing changes
    if let Err(e) = transfer(&db, "bob", "alice", 1_000) {
        println!("rejected: {e:?}");
    }
    println!("after rejected transfer: {:?}", db.get_all());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
