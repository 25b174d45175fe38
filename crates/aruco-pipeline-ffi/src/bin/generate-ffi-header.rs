//! Generates the C header for the pipeline ABI with cbindgen.
//!
//! Run with `cargo run -p aruco-pipeline-ffi --features generate-header
//! --bin generate-ffi-header`.

fn main() {
    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set");
    let out = std::path::Path::new(&crate_dir).join("include/aruco_pipeline.h");

    cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("ARUCO_PIPELINE_H")
        .with_cpp_compat(true)
        .generate()
        .expect("cbindgen header generation")
        .write_to_file(&out);

    println!("wrote {}", out.display());
}
