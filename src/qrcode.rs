use image::DynamicImage;
use rqrr::PreparedImage;
use std::path::Path;

use crate::account::Account;
use crate::otpauth;

pub fn read_account_qr(image: DynamicImage) -> anyhow::Result<Account> {
    let mut prepared = PreparedImage::prepare(image.to_luma8());

    let grids = prepared.detect_grids();
    let Some(grid) = grids.first() else {
        anyhow::bail!("No QR codes found in the image");
    };

    let (_, content) = grid.decode()?;
    tracing::debug!(codes = grids.len(), "decoded QR code");

    Ok(otpauth::parse(&content)?)
}

pub fn read_account_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Account> {
    let image = image::open(path)?;
    read_account_qr(image)
}
