use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::data::frame_buffer::FrameBuffer;

pub fn write_ppm(frame: &FrameBuffer, filepath: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(filepath)?);

    // PPM header: P6 means binary RGB, then width height max_colour
    writeln!(file, "P6")?;
    writeln!(file, "{} {}", frame.width(), frame.height())?;
    writeln!(file, "255")?;
    file.write_all(frame.buffer())?;
    file.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::colour::Colour;
    use crate::core::data::point::Point;

    #[test]
    fn test_writes_header_and_pixels() {
        let mut frame = FrameBuffer::new(2, 1).unwrap();
        frame
            .set_pixel(Point { x: 1, y: 0 }, Colour { r: 1, g: 2, b: 3 })
            .unwrap();
        let path = std::env::temp_dir().join(format!("write_ppm_{}.ppm", std::process::id()));

        write_ppm(&frame, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(bytes, b"P6\n2 1\n255\n\x00\x00\x00\x01\x02\x03".to_vec());
    }
}
