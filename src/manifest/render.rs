//! Generated C++ registration header.

use std::fmt::Write;

use super::Manifest;

/// Names used in the generated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStyle {
    /// Enclosing C++ namespace.
    pub namespace: String,
    /// Registration routine name.
    pub init_fn: String,
    /// UI server type the routine receives a pointer to.
    pub ui_type: String,
}

impl Default for ArtifactStyle {
    fn default() -> Self {
        Self {
            namespace: "esp32m".into(),
            init_fn: "initUi".into(),
            ui_type: "Ui".into(),
        }
    }
}

/// Render the registration header for `manifest`.
///
/// The text is built entirely in memory; nothing is written here.
pub fn render(manifest: &Manifest, style: &ArtifactStyle) -> String {
    let mut out = String::new();

    out.push_str("// This is auto-generated file, do not edit!\n");
    out.push_str("// This file is to be included only once from main.cpp!\n\n");
    out.push_str("#pragma once\n\n");
    let _ = writeln!(out, "namespace {} {{\n", style.namespace);

    for asset in manifest.assets() {
        let symbol = &asset.symbol;
        let _ = writeln!(out, "  extern \"C\" const uint8_t {symbol}_start[];");
        let _ = writeln!(out, "  extern \"C\" const uint8_t {symbol}_end[];");
    }

    let _ = writeln!(
        out,
        "\n  static inline void {}({}* ui) {{",
        style.init_fn, style.ui_type
    );
    for asset in manifest.assets() {
        let _ = writeln!(
            out,
            "    ui->addAsset(\"{url}\", \"{ct}\", {sym}_start, {sym}_end, \"{ce}\", \"\\\"{etag}\\\"\");",
            url = asset.url,
            ct = asset.content_type,
            sym = asset.symbol,
            ce = asset.content_encoding,
            etag = asset.etag,
        );
    }
    out.push_str("  }\n");
    out.push_str("}\n");

    out
}
