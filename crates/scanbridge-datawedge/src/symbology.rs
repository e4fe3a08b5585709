//! Barcode symbology table
//!
//! Every decoder DataWedge's barcode plugin knows, keyed by its
//! `decoder_*` parameter name. Profile configuration enumerates the full
//! table and flags each decoder on or off, so the resulting profile never
//! inherits stale decoder state.

use serde::{Deserialize, Serialize};

/// A barcode symbology the scanner can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbology {
    Code11,
    Code128,
    Code39,
    Ean13,
    Ean8,
    Korean3Of5,
    Chinese2Of5,
    D2Of5,
    Trioptic39,
    Code93,
    Msi,
    Codabar,
    Upce0,
    Upce1,
    Upca,
    Us4State,
    Tlc39,
    Mailmark,
    Hanxin,
    Signature,
    Webcode,
    Matrix2Of5,
    Matrix2Of5Redundancy,
    Matrix2Of5ReportCheckDigit,
    Matrix2Of5VerifyCheckDigit,
    I2Of5,
    I2Of5Redundancy,
    I2Of5ReportCheckDigit,
    I2Of5ConvertToEan13,
    I2Of5CheckDigit,
    I2Of5SecurityLevel,
    Gs1Databar,
    Datamatrix,
    QrCode,
    Gs1Datamatrix,
    Gs1QrCode,
    Pdf417,
    CompositeAb,
    CompositeC,
    MicroQr,
    Aztec,
    Maxicode,
    MicroPdf,
    UsPostnet,
    UsPlanet,
    AustralianPostal,
    UkPostal,
    JapanesePostal,
    CanadianPostal,
    DutchPostal,
    Gs1LimSecurityLevel,
}

impl Symbology {
    /// The `PARAM_LIST` key controlling this decoder
    pub fn decoder_name(self) -> &'static str {
        match self {
            Symbology::Code11 => "decoder_code11",
            Symbology::Code128 => "decoder_code128",
            Symbology::Code39 => "decoder_code39",
            Symbology::Ean13 => "decoder_ean13",
            Symbology::Ean8 => "decoder_ean8",
            Symbology::Korean3Of5 => "decoder_korean_3of5",
            Symbology::Chinese2Of5 => "decoder_chinese_2of5",
            Symbology::D2Of5 => "decoder_d2of5",
            Symbology::Trioptic39 => "decoder_trioptic39",
            Symbology::Code93 => "decoder_code93",
            Symbology::Msi => "decoder_msi",
            Symbology::Codabar => "decoder_codabar",
            Symbology::Upce0 => "decoder_upce0",
            Symbology::Upce1 => "decoder_upce1",
            Symbology::Upca => "decoder_upca",
            Symbology::Us4State => "decoder_us4state",
            Symbology::Tlc39 => "decoder_tlc39",
            Symbology::Mailmark => "decoder_mailmark",
            Symbology::Hanxin => "decoder_hanxin",
            Symbology::Signature => "decoder_signature",
            Symbology::Webcode => "decoder_webcode",
            Symbology::Matrix2Of5 => "decoder_matrix_2of5",
            Symbology::Matrix2Of5Redundancy => "decoder_matrix_2of5_redundancy",
            Symbology::Matrix2Of5ReportCheckDigit => "decoder_matrix_2of5_report_check_digit",
            Symbology::Matrix2Of5VerifyCheckDigit => "decoder_matrix_2of5_verify_check_digit",
            Symbology::I2Of5 => "decoder_i2of5",
            Symbology::I2Of5Redundancy => "decoder_i2of5_redundancy",
            Symbology::I2Of5ReportCheckDigit => "decoder_i2of5_report_check_digit",
            Symbology::I2Of5ConvertToEan13 => "decoder_i2of5_convert_to_ean13",
            Symbology::I2Of5CheckDigit => "decoder_i2of5_check_digit",
            Symbology::I2Of5SecurityLevel => "decoder_i2of5_security_level",
            Symbology::Gs1Databar => "decoder_gs1_databar",
            Symbology::Datamatrix => "decoder_datamatrix",
            Symbology::QrCode => "decoder_qrcode",
            Symbology::Gs1Datamatrix => "decoder_gs1_datamatrix",
            Symbology::Gs1QrCode => "decoder_gs1_qrcode",
            Symbology::Pdf417 => "decoder_pdf417",
            Symbology::CompositeAb => "decoder_composite_ab",
            Symbology::CompositeC => "decoder_composite_c",
            Symbology::MicroQr => "decoder_microqr",
            Symbology::Aztec => "decoder_aztec",
            Symbology::Maxicode => "decoder_maxicode",
            Symbology::MicroPdf => "decoder_micropdf",
            Symbology::UsPostnet => "decoder_uspostnet",
            Symbology::UsPlanet => "decoder_usplanet",
            Symbology::AustralianPostal => "decoder_australian_postal",
            Symbology::UkPostal => "decoder_uk_postal",
            Symbology::JapanesePostal => "decoder_japanese_postal",
            Symbology::CanadianPostal => "decoder_canadian_postal",
            Symbology::DutchPostal => "decoder_dutch_postal",
            Symbology::Gs1LimSecurityLevel => "decoder_gs1_lim_security_level",
        }
    }

    /// Reverse lookup from a `decoder_*` parameter name
    pub fn from_decoder_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|symbology| symbology.decoder_name() == name)
    }

    /// Every decoder the barcode plugin accepts
    pub const ALL: &'static [Symbology] = &[
        Symbology::Code11,
        Symbology::Code128,
        Symbology::Code39,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Korean3Of5,
        Symbology::Chinese2Of5,
        Symbology::D2Of5,
        Symbology::Trioptic39,
        Symbology::Code93,
        Symbology::Msi,
        Symbology::Codabar,
        Symbology::Upce0,
        Symbology::Upce1,
        Symbology::Upca,
        Symbology::Us4State,
        Symbology::Tlc39,
        Symbology::Mailmark,
        Symbology::Hanxin,
        Symbology::Signature,
        Symbology::Webcode,
        Symbology::Matrix2Of5,
        Symbology::Matrix2Of5Redundancy,
        Symbology::Matrix2Of5ReportCheckDigit,
        Symbology::Matrix2Of5VerifyCheckDigit,
        Symbology::I2Of5,
        Symbology::I2Of5Redundancy,
        Symbology::I2Of5ReportCheckDigit,
        Symbology::I2Of5ConvertToEan13,
        Symbology::I2Of5CheckDigit,
        Symbology::I2Of5SecurityLevel,
        Symbology::Gs1Databar,
        Symbology::Datamatrix,
        Symbology::QrCode,
        Symbology::Gs1Datamatrix,
        Symbology::Gs1QrCode,
        Symbology::Pdf417,
        Symbology::CompositeAb,
        Symbology::CompositeC,
        Symbology::MicroQr,
        Symbology::Aztec,
        Symbology::Maxicode,
        Symbology::MicroPdf,
        Symbology::UsPostnet,
        Symbology::UsPlanet,
        Symbology::AustralianPostal,
        Symbology::UkPostal,
        Symbology::JapanesePostal,
        Symbology::CanadianPostal,
        Symbology::DutchPostal,
        Symbology::Gs1LimSecurityLevel,
    ];
}
