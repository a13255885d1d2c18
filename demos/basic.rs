use json_kv::JsonKv;

fn main() -> Result<(), json_kv::Error> {
    let path = std::env::temp_dir().join("json_kv_example_basic.json");
    let _ = std::fs::remove_file(&path);
    let db = JsonKv::<i32>::open(&path)?;

    // set / get / delete, each one lands on disk before it returns
    db.set("apples", 3)?;
    db.set("bananas", 5)?;
    println!("apples  = {:?}", db.get("apples"));
    println!("bananas = {:?}", db.get("bananas"));
    db.delete("bananas")?;
    println!("bananas after delete = {:?}", db.get("bananas"));

    // update in place
    db.update("apples", |n| *n += 1)?;
    println!("apples after update = {:?}", db.get("apples"));

    // bulk set, one write
    db.extend([("grapes", 12), ("lemons", 7)])?;

    // snapshots
    println!("keys   = {:?}", db.keys());
    println!("all    = {:?}", db.get_all());
    println!("len    = {}", db.len());

    db.clear()?;
    println!("after clear: len = {}", db.len());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
