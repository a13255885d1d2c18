use json_kv::{Codec, Error, JsonCodec, JsonKv};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Set(String, i64),
    Delete(String),
    Commit(Vec<(String, Option<i64>)>),
    Abort(Vec<(String, Option<i64>)>),
}

// small key space so sets, deletes and overwrites actually collide
fn key() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "user:1", "user:2", "ünï"]).prop_map(String::from)
}

fn staged() -> impl Strategy<Value = Vec<(String, Option<i64>)>> {
    prop::collection::vec((key(), prop::option::of(any::<i64>())), 0..6)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (key(), any::<i64>()).prop_map(|(k, v)| Op::Set(k, v)),
        key().prop_map(Op::Delete),
        staged().prop_map(Op::Commit),
        staged().prop_map(Op::Abort),
    ]
}

fn stage(tx: &mut json_kv::Transaction<i64>, writes: &[(String, Option<i64>)]) {
    for (k, v) in writes {
        match v {
            Some(v) => {
                tx.set(k.clone(), *v);
            }
            None => {
                tx.delete(k);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn store_matches_model_and_survives_reopen(ops in prop::collection::vec(op(), 0..30)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let db = JsonKv::<i64>::builder(&path).sync(false).build().unwrap();
        let mut model: HashMap<String, i64> = HashMap::new();

        for op in &ops {
            match op {
                Op::Set(k, v) => {
                    let prev = db.set(k.clone(), *v).unwrap();
                    prop_assert_eq!(prev, model.insert(k.clone(), *v));
                }
                Op::Delete(k) => {
                    let prev = db.delete(k).unwrap();
                    prop_assert_eq!(prev, model.remove(k));
                }
                Op::Commit(writes) => {
                    db.transaction(|tx| {
                        stage(tx, writes);
                        Ok::<_, Error>(())
                    }).unwrap();
                    for (k, v) in writes {
                        match v {
                            Some(v) => { model.insert(k.clone(), *v); }
                            None => { model.remove(k); }
                        }
                    }
                }
                Op::Abort(writes) => {
                    let res = db.transaction(|tx| {
                        stage(tx, writes);
                        Err::<(), _>(Error::Config("abort".into()))
                    });
                    prop_assert!(res.is_err());
                }
            }
            prop_assert_eq!(db.get_all(), model.clone());
        }

        let reopened = JsonKv::<i64>::open(&path).unwrap();
        prop_assert_eq!(reopened.get_all(), model);
    }

    #[test]
    fn encode_decode_preserves_mapping(
        entries in prop::collection::hash_map(".{0,12}", prop::collection::vec(any::<i32>(), 0..4), 0..12)
    ) {
        for codec in [JsonCodec::pretty(), JsonCodec::compact()] {
            let bytes = codec.encode(&entries).unwrap();
            let back: HashMap<String, Vec<i32>> = codec.decode(&bytes).unwrap();
            prop_assert_eq!(&back, &entries);
            prop_assert_eq!(codec.encode(&back).unwrap(), bytes);
        }
    }
}
