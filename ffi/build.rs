use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-env-changed=TODO_VIEW_HEADER_DIR");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let Ok(out_dir) = env::var("OUT_DIR").map(PathBuf::from) else {
        println!("cargo:warning=OUT_DIR not set, skipping C header generation");
        return;
    };

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("TODO_VIEW_H".to_string()),
        ..Default::default()
    };

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=skipping C header generation: {err}");
            return;
        }
    };

    let header = out_dir.join("todo_view.h");
    bindings.write_to_file(&header);
    println!("cargo:rustc-env=TODO_VIEW_HEADER={}", header.display());

    // Hosts that want the header at a stable path opt in with a directory.
    if let Ok(dir) = env::var("TODO_VIEW_HEADER_DIR") {
        let dir = PathBuf::from(dir);
        let copied = std::fs::create_dir_all(&dir)
            .and_then(|()| std::fs::copy(&header, dir.join("todo_view.h")));
        if let Err(err) = copied {
            println!("cargo:warning=cannot copy header to {}: {err}", dir.display());
        }
    }
}
