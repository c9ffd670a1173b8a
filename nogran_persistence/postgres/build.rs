use std::{
    collections::BTreeMap,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

#[derive(Default)]
struct MigrationFiles {
    up: Option<String>,
    down: Option<String>,
}

fn main() {
    println!("cargo::rerun-if-changed=migrations");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let migrations_rs = out_dir.join("migrations.rs");
    let migrations = collect_migrations(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations"));
    emit_migrations(&migrations_rs, &migrations);
    println!("cargo::rustc-env=MIGRATIONS={}", migrations_rs.display());
}

fn emit_migrations(path: &Path, migrations: &BTreeMap<String, MigrationFiles>) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = BufWriter::new(file);
    write!(&mut writer, "&[").unwrap();
    for (name, files) in migrations {
        let (Some(up), Some(down)) = (&files.up, &files.down) else {
            panic!("Migration {name} needs both an up.sql and a down.sql file");
        };
        write!(
            &mut writer,
            "Migration{{name:{name:?},up:{up:?},down:{down:?}}},"
        )
        .unwrap();
    }
    write!(&mut writer, "]").unwrap();
    writer.flush().unwrap();
}

fn collect_migrations(dir: &Path) -> BTreeMap<String, MigrationFiles> {
    let mut out = BTreeMap::<String, MigrationFiles>::new();
    for file in dir.read_dir().unwrap() {
        let file = file.unwrap();
        let file_name = file.file_name().into_string().unwrap();

        if let Some(name) = file_name.strip_suffix(".up.sql") {
            let content = std::fs::read_to_string(file.path()).unwrap();
            out.entry(name.into()).or_default().up = Some(content);
        } else if let Some(name) = file_name.strip_suffix(".down.sql") {
            let content = std::fs::read_to_string(file.path()).unwrap();
            out.entry(name.into()).or_default().down = Some(content);
        }
    }
    out
}
