// Session store example for rprefs
//
// Run with: RUST_LOG=debug cargo run --example session_store --features derive

use rprefs::{
    DerivePreferenceEnum, EnumCodec, FileStore, FileStoreConfig, JsonCodec, LongCodec, Nullable,
    ObservablePreference, Preference, Preferences, StringCodec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, DerivePreferenceEnum)]
enum Theme {
    #[preference(name = "light")]
    Light,
    #[preference(name = "dark")]
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Person {
    name: String,
    age: u32,
}

/// Preferences of one signed-in session, built once at startup
struct SessionStore {
    age: Preference<Nullable<LongCodec>>,
    token: ObservablePreference<StringCodec>,
    theme: Preference<EnumCodec<Theme>>,
    owner: Preference<JsonCodec<Person>>,
}

impl SessionStore {
    fn new(prefs: &Preferences) -> rprefs::Result<Self> {
        Ok(Self {
            age: prefs.long_opt("age_key")?,
            token: prefs.string("token_key", "")?.observable(),
            theme: prefs.enumeration("theme", Theme::Light)?,
            owner: prefs.json(
                "owner",
                Person {
                    name: "stranger".into(),
                    age: 1,
                },
            )?,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = FileStoreConfig::builder("session-example")
        .config_dir("./example_config")
        .build();
    let store = Arc::new(FileStore::open(config)?);
    let session = SessionStore::new(&Preferences::new(store.clone()))?;

    println!("🔑 rprefs Session Store Example\n");
    println!("📁 Preferences file: {}", store.path().display());

    let _listener = session.token.subscribe(|token: &String| {
        if token.is_empty() {
            println!("🔔 Signed out");
        } else {
            println!("🔔 Token is now {token}");
        }
    })?;

    session.token.set("abc".into())?;
    session.token.set("abc".into())?;
    session.token.set("xyz".into())?;

    session.age.set(Some(26))?;
    println!("🎂 Age: {:?}", session.age.get()?);
    session.age.set(None)?;
    println!("🎂 Age after clearing: {:?}", session.age.get()?);

    session.theme.set(Theme::Dark)?;
    println!("🎨 Theme: {:?}", session.theme.get()?);

    println!("👤 Owner before: {:?}", session.owner.get()?);
    session.owner.set(Person {
        name: "Johny".into(),
        age: 22,
    })?;
    println!("👤 Owner after: {:?}", session.owner.get()?);

    session.token.reset()?;

    println!("\n✅ Done");
    Ok(())
}
