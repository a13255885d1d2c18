use json_kv::JsonKv;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    name: String,
    age: u32,
}

fn main() -> Result<(), json_kv::Error> {
    let dir = std::env::temp_dir().join("json_kv_example_builder");
    let path = dir.join("nested").join("users.json");

    // compact JSON, no fsync; parent directories are created on open
    let db = JsonKv::<User>::builder(&path)
        .pretty(false)
        .sync(false)
        .build()?;

    db.set("user:1", User { name: "Alice".into(), age: 30 })?;
    db.set("user:2", User { name: "Bob".into(), age: 25 })?;

    let contents = std::fs::read_to_string(db.path())?;
    println!("On-disk JSON:\n{contents}");

    println!("\nDebug output: {db:?}");

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
