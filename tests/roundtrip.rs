//! End-to-end coverage of the public file-based API: packing a small
//! virtual filesystem, hiding it in a generated carrier image, and getting
//! it back out again.

use std::fs;

use image::{ImageFormat, Rgb, RgbImage};
use stegapp_core::{embed, extract, list_vfs, pack_vfs, unpack_vfs};
use tempfile::tempdir;

fn write_carrier(path: &std::path::Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

#[test]
fn embed_pack_then_extract_unpack_recovers_original_files() {
    let work = tempdir().unwrap();

    let note = work.path().join("note.txt");
    fs::write(&note, b"hidden message").unwrap();

    let assets = work.path().join("assets");
    fs::create_dir(&assets).unwrap();
    fs::write(assets.join("data.bin"), [0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

    let carrier = work.path().join("carrier.png");
    write_carrier(&carrier, 256, 256);

    let blob = pack_vfs(&[note.clone()], &[assets.clone()]).unwrap();

    let stego = work.path().join("stego.png");
    embed(&carrier, &blob, &stego, false).unwrap();

    let recovered_blob = extract(&stego).unwrap();
    assert_eq!(recovered_blob, blob);

    let out_dir = work.path().join("out");
    unpack_vfs(&recovered_blob, &out_dir).unwrap();

    assert_eq!(fs::read(out_dir.join("note.txt")).unwrap(), b"hidden message");
    assert_eq!(
        fs::read(out_dir.join("assets").join("data.bin")).unwrap(),
        [0xDE, 0xAD, 0xBE, 0xEF]
    );
}

#[test]
fn list_vfs_reports_entries_without_writing_anything() {
    let work = tempdir().unwrap();
    let note = work.path().join("a.txt");
    fs::write(&note, b"x").unwrap();

    let blob = pack_vfs(&[note], &[]).unwrap();
    let entries = list_vfs(&blob).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "a.txt");
}

#[test]
fn embed_rejects_payload_too_large_for_carrier() {
    let work = tempdir().unwrap();
    let carrier = work.path().join("small.png");
    write_carrier(&carrier, 32, 32);

    let huge_payload = vec![0u8; 100_000];
    let out = work.path().join("out.png");

    let result = embed(&carrier, &huge_payload, &out, false);
    assert!(result.is_err());
    assert!(!out.exists());
}

#[test]
fn extract_fails_cleanly_on_a_carrier_with_no_hidden_payload() {
    let work = tempdir().unwrap();
    let carrier = work.path().join("plain.png");
    write_carrier(&carrier, 64, 64);

    let result = extract(&carrier);
    assert!(result.is_err());
}

#[test]
fn unpack_vfs_refuses_to_write_outside_the_destination_directory() {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file("../escape.txt", options).unwrap();
        zip.write_all(b"nope").unwrap();
        zip.finish().unwrap();
    }

    let dest = tempdir().unwrap();
    let result = unpack_vfs(&buffer, dest.path());
    assert!(result.is_err());
    assert!(fs::read_dir(dest.path()).unwrap().next().is_none());
}

#[test]
fn embed_output_is_written_atomically_and_readable_immediately() {
    let work = tempdir().unwrap();
    let carrier = work.path().join("carrier.png");
    write_carrier(&carrier, 128, 128);

    let payload = b"small payload".to_vec();
    let out = work.path().join("nested").join("does-not-exist-yet.png");
    fs::create_dir_all(out.parent().unwrap()).unwrap();

    embed(&carrier, &payload, &out, false).unwrap();
    assert!(out.exists());

    let recovered = extract(&out).unwrap();
    assert_eq!(recovered, payload);
}
