use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use zip::ZipArchive;

const FONT_FILE: &str = "NotoSans-Regular.ttf";
// Pinned release; Noto Sans covers the Vietnamese diacritics used in the tree data.
const ZIP_URL: &str =
    "https://github.com/notofonts/latin-greek-cyrillic/releases/download/NotoSans-v2.013/NotoSans-v2.013.zip";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FONT_TTF");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let target_font = out_dir.join(FONT_FILE);

    // Incremental build: keep a previously fetched non-empty font
    if fs::metadata(&target_font).map(|m| m.len() > 0).unwrap_or(false) {
        return;
    }

    if let Ok(path) = env::var("FONT_TTF") {
        match fs::copy(&path, &target_font) {
            Ok(_) => return,
            Err(e) => println!("cargo:warning=failed to copy FONT_TTF {path}: {e}"),
        }
    }

    let zip_path = out_dir.join("NotoSans.zip");
    if download(&zip_path) && extract(&zip_path, &target_font) {
        return;
    }

    // The browser has no system fonts for resvg to fall back on
    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("wasm32") {
        panic!(
            "failed to obtain {FONT_FILE}; wasm builds require a real font for text rendering, set FONT_TTF"
        );
    }

    // Native builds fall back to system fonts at capture time
    println!("cargo:warning=embedded font unavailable; set FONT_TTF to embed one");
    fs::write(&target_font, b"").expect("write placeholder font failed");
}

fn download(zip_path: &Path) -> bool {
    let dest = zip_path.to_string_lossy().to_string();
    let curl = Command::new("curl")
        .args(["-L", "-f", "-s", "--max-time", "60", "-o", &dest, ZIP_URL])
        .status();
    if let Ok(st) = curl
        && st.success()
    {
        return true;
    }
    let wget = Command::new("wget")
        .args(["-q", "-T", "60", "-O", &dest, ZIP_URL])
        .status();
    matches!(wget, Ok(st) if st.success())
}

fn extract(zip_path: &Path, target_font: &Path) -> bool {
    let mut data = Vec::new();
    let Ok(mut f) = fs::File::open(zip_path) else {
        return false;
    };
    if f.read_to_end(&mut data).is_err() {
        return false;
    }
    let Ok(mut zip) = ZipArchive::new(std::io::Cursor::new(data)) else {
        return false;
    };
    // Prefer the unhinted TTF; any matching file name will do
    let mut fallback = None;
    for i in 0..zip.len() {
        let Ok(file) = zip.by_index(i) else { continue };
        let name = file.name().to_string();
        if name.ends_with(FONT_FILE) {
            if name.contains("unhinted") {
                fallback = Some(i);
                break;
            }
            fallback.get_or_insert(i);
        }
    }
    let Some(idx) = fallback else {
        println!("cargo:warning={FONT_FILE} not found in font archive");
        return false;
    };
    let Ok(mut file) = zip.by_index(idx) else {
        return false;
    };
    let mut buf = Vec::new();
    if std::io::copy(&mut file, &mut buf).is_err() || buf.is_empty() {
        return false;
    }
    fs::write(target_font, &buf).is_ok()
}
