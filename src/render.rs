use crate::exitlist::ObservationTable;
use crate::Error;
use image::{ImageOutputFormat, Rgba, RgbaImage};
use std::convert::TryFrom;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Alternating column colors. They only separate neighbouring columns and
/// carry no meaning of their own.
pub const PALETTE: [Rgba<u8>; 2] = [Rgba([0, 0, 255, 255]), Rgba([255, 0, 0, 255])];

/// One column per address in [`ObservationTable::sorted`] order, one row per
/// ingested file. A pixel is colored iff the address was listed in that file.
pub fn render(table: &ObservationTable) -> Result<RgbaImage, Error> {
    let (width, height) = (table.len(), table.file_count());
    let too_large = || Error::Dimensions { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;

    let mut img = RgbaImage::from_pixel(w, h, BACKGROUND);
    for (x, (_, files)) in (0..w).zip(table.sorted()) {
        let c = PALETTE[x as usize % PALETTE.len()];
        for &y in files {
            // Indices come from this table, so they are below file_count.
            img.put_pixel(x, y as u32, c);
        }
    }
    Ok(img)
}

/// PNG bytes for `img`, exactly as [`write_png`] stores them.
pub fn encode_png(img: &RgbaImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageOutputFormat::Png)?;
    Ok(buf.into_inner())
}

/// Encodes before creating `path`, so a failed encode leaves no file behind.
pub fn write_png(img: &RgbaImage, path: &Path) -> Result<(), Error> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let png = encode_png(img).map_err(write_err)?;
    let mut f = File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })?;
    f.write_all(&png)
        .and_then(|_| f.flush())
        .map_err(|e| write_err(image::ImageError::IoError(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exitlist::parse_exit_address;
    use quickcheck_macros::quickcheck;

    fn table(files: &[&str]) -> ObservationTable {
        let mut t = ObservationTable::new();
        for f in files {
            t.ingest_reader(Cursor::new(f.as_bytes())).unwrap();
        }
        t
    }

    #[test]
    fn two_files_second_empty() {
        let t = table(&["ExitAddress 9.9.9.9 2016-02-25 14:07:28\n", ""]);
        let img = render(&t).unwrap();
        assert_eq!((1, 2), img.dimensions());
        assert_eq!(&PALETTE[0], img.get_pixel(0, 0));
        assert_eq!(&BACKGROUND, img.get_pixel(0, 1));
    }

    #[test]
    fn columns_alternate_colors() {
        let t = table(&["ExitAddress a x\nExitAddress b x\nExitAddress c x\n"]);
        let img = render(&t).unwrap();
        assert_eq!((3, 1), img.dimensions());
        assert_eq!(&PALETTE[0], img.get_pixel(0, 0));
        assert_eq!(&PALETTE[1], img.get_pixel(1, 0));
        assert_eq!(&PALETTE[0], img.get_pixel(2, 0));
    }

    #[test]
    fn png_is_rgba_and_decodes_back() {
        let t = table(&["ExitAddress a x\n", "ExitAddress b x\n", ""]);
        let img = render(&t).unwrap();
        let bytes = encode_png(&img).unwrap();
        assert_eq!(b"\x89PNG\r\n\x1a\n", &bytes[..8]);
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(image::ColorType::Rgba8, back.color());
        assert_eq!(img, back.to_rgba8());
    }

    #[test]
    fn write_png_stores_encoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let t = table(&["ExitAddress a x\nExitAddress b x\n", "ExitAddress b x\n"]);
        let img = render(&t).unwrap();
        write_png(&img, &path).unwrap();
        assert_eq!(encode_png(&img).unwrap(), std::fs::read(&path).unwrap());
    }

    #[test]
    fn write_png_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.png");
        let img = RgbaImage::from_pixel(1, 1, BACKGROUND);
        let err = write_png(&img, &path).unwrap_err();
        assert!(matches!(err, Error::Create { .. }));
        assert!(err.to_string().starts_with("Failed to create "));
    }

    #[quickcheck]
    fn marked_iff_listed(files: Vec<Vec<u8>>) -> bool {
        let listings: Vec<String> = files
            .iter()
            .map(|ips| {
                ips.iter()
                    .map(|b| format!("ExitAddress 10.0.{}.1 x\n", b % 16))
                    .collect()
            })
            .collect();
        let refs: Vec<&str> = listings.iter().map(|s| s.as_str()).collect();
        let t = table(&refs);
        let img = match render(&t) {
            Ok(img) => img,
            Err(_) => return false,
        };
        if img.dimensions() != (t.len() as u32, files.len() as u32) {
            return false;
        }
        t.sorted().iter().enumerate().all(|(x, (ip, _))| {
            (0..files.len()).all(|y| {
                let listed = listings[y]
                    .lines()
                    .any(|l| parse_exit_address(l).map(str::as_bytes) == Some(*ip));
                let marked = *img.get_pixel(x as u32, y as u32) != BACKGROUND;
                listed == marked
            })
        })
    }
}
