//! Terminal pages: Home, Scan Prediction Test, Contact.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use lazy_static::lazy_static;
use log::debug;

use crate::encoder::{encode, ExpectedSchema};
use crate::model::PredictionService;
use crate::records::PatientDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Scan,
    Contact,
}

/// Per-session navigation state, passed explicitly to every page handler.
pub struct SessionContext {
    pub current: Page,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            current: Page::Home,
        }
    }
}

const SEX_LABELS: [&str; 2] = ["Laki-laki", "Perempuan"];
const CP_LABELS: [&str; 4] = ["Typical angina", "Atypical angina", "Non-angina", "Tanpa gejala"];
const FBS_LABELS: [&str; 2] = ["Tidak", "Ya"];
const RESTECG_LABELS: [&str; 3] = ["Normal", "Ada kelainan", "Hypertrophy"];
const EXANG_LABELS: [&str; 2] = ["Tidak", "Ya"];
const SLOPE_LABELS: [&str; 3] = ["Meningkat", "Mendatar", "Menurun"];
const CA_LABELS: [&str; 4] = ["0", "1", "2", "3"];
const THAL_LABELS: [&str; 3] = ["Normal", "Cacat tetap", "Cacat reversibel"];

lazy_static! {
    static ref SEX_CODES: HashMap<&'static str, i32> =
        HashMap::from([("Laki-laki", 1), ("Perempuan", 0)]);
    static ref CP_CODES: HashMap<&'static str, i32> = HashMap::from([
        ("Typical angina", 0),
        ("Atypical angina", 1),
        ("Non-angina", 2),
        ("Tanpa gejala", 3),
    ]);
    static ref FBS_CODES: HashMap<&'static str, i32> = HashMap::from([("Tidak", 0), ("Ya", 1)]);
    static ref RESTECG_CODES: HashMap<&'static str, i32> =
        HashMap::from([("Normal", 0), ("Ada kelainan", 1), ("Hypertrophy", 2)]);
    static ref EXANG_CODES: HashMap<&'static str, i32> = HashMap::from([("Tidak", 0), ("Ya", 1)]);
    static ref SLOPE_CODES: HashMap<&'static str, i32> =
        HashMap::from([("Meningkat", 0), ("Mendatar", 1), ("Menurun", 2)]);
    // TODO: confirm the thal code for "Normal" against the model's training
    // labels; 0 is unreachable with this map.
    static ref THAL_CODES: HashMap<&'static str, i32> =
        HashMap::from([("Normal", 1), ("Cacat tetap", 2), ("Cacat reversibel", 3)]);
}

fn read_trimmed<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        // EOF behaves like leaving the field blank
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_u32<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    min: u32,
    max: u32,
) -> io::Result<Option<u32>> {
    loop {
        write!(out, "{label} [{min}-{max}]: ")?;
        out.flush()?;
        let line = match read_trimmed(input)? {
            Some(line) => line,
            None => return Ok(None),
        };
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<u32>() {
            Ok(v) if (min..=max).contains(&v) => return Ok(Some(v)),
            _ => writeln!(out, "Nilai tidak valid.")?,
        }
    }
}

fn prompt_f64<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    min: f64,
    max: f64,
) -> io::Result<Option<f64>> {
    loop {
        write!(out, "{label} [{min}-{max}]: ")?;
        out.flush()?;
        let line = match read_trimmed(input)? {
            Some(line) => line,
            None => return Ok(None),
        };
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<f64>() {
            Ok(v) if (min..=max).contains(&v) => return Ok(Some(v)),
            _ => writeln!(out, "Nilai tidak valid.")?,
        }
    }
}

fn prompt_choice<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    options: &[&'static str],
) -> io::Result<Option<&'static str>> {
    loop {
        writeln!(out, "{label}:")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, option)?;
        }
        write!(out, "Pilih [1-{}]: ", options.len())?;
        out.flush()?;
        let line = match read_trimmed(input)? {
            Some(line) => line,
            None => return Ok(None),
        };
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(options[n - 1])),
            _ => writeln!(out, "Pilihan tidak valid.")?,
        }
    }
}

fn map_label(
    label: Option<&'static str>,
    codes: &HashMap<&'static str, i32>,
) -> Option<i32> {
    label.and_then(|l| codes.get(l).copied())
}

/// Collects the 13 patient fields. Display labels are mapped to the numeric
/// codes here, before anything reaches the encoder; blank answers stay unset.
fn collect_draft<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<PatientDraft> {
    let mut draft = PatientDraft::default();
    draft.age = prompt_u32(input, out, "Usia", 0, 119)?;
    draft.sex = map_label(
        prompt_choice(input, out, "Jenis kelamin", &SEX_LABELS)?,
        &SEX_CODES,
    );
    draft.cp = map_label(
        prompt_choice(input, out, "Jenis nyeri dada", &CP_LABELS)?,
        &CP_CODES,
    );
    draft.trestbps = prompt_u32(input, out, "Tekanan darah istirahat (mmHg)", 0, 370)?;
    draft.chol = prompt_u32(input, out, "Serum kolestrol (mg/dL)", 100, 1000)?;
    draft.fbs = map_label(
        prompt_choice(input, out, "Gula darah puasa >120 mg/dL?", &FBS_LABELS)?,
        &FBS_CODES,
    );
    draft.restecg = map_label(
        prompt_choice(
            input,
            out,
            "Hasil elektrokardiografi istirahat",
            &RESTECG_LABELS,
        )?,
        &RESTECG_CODES,
    );
    draft.thalach = prompt_u32(
        input,
        out,
        "HRmax - Denyut jantung maksimum yang tercapai",
        27,
        600,
    )?;
    draft.exang = map_label(
        prompt_choice(
            input,
            out,
            "Nyeri dada yang dipicu oleh olahraga",
            &EXANG_LABELS,
        )?,
        &EXANG_CODES,
    );
    draft.oldpeak = prompt_f64(input, out, "Oldpeak", 0.0, 6.2)?;
    draft.slope = map_label(
        prompt_choice(
            input,
            out,
            "Kemiringan puncak segmen ST yang dipicu oleh olahraga",
            &SLOPE_LABELS,
        )?,
        &SLOPE_CODES,
    );
    draft.ca = prompt_choice(
        input,
        out,
        "Jumlah pembuluh darah besar yang diwarnai fluoroskopi",
        &CA_LABELS,
    )?
    .and_then(|l| l.parse().ok());
    draft.thal = map_label(
        prompt_choice(input, out, "Hasil tes Stres Thalium", &THAL_LABELS)?,
        &THAL_CODES,
    );
    Ok(draft)
}

pub fn home_page<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<Page>> {
    writeln!(out, "## HeartBeats")?;
    writeln!(
        out,
        "HeartBeats adalah platform yang dapat membantu para dokter untuk memberikan \
         diagnosa awal tentang kondisi dan kesehatan jantung. Dengan fitur scan kesehatan \
         jantung yang dimiliki oleh HeartBeats, setiap dokter dapat terbantu untuk \
         mendapatkan hasil diagnosa terbaik dari platform ini."
    )?;
    loop {
        writeln!(out, "  1) Periksa sekarang")?;
        writeln!(out, "  2) Kontak")?;
        writeln!(out, "  0) Keluar")?;
        write!(out, "Pilih: ")?;
        out.flush()?;
        match read_trimmed(input)?.as_deref() {
            Some("1") => return Ok(Some(Page::Scan)),
            Some("2") => return Ok(Some(Page::Contact)),
            Some("0") | None => return Ok(None),
            Some(_) => writeln!(out, "Pilihan tidak valid.")?,
        }
    }
}

/// One scan attempt: collect the form, then either score it or go back.
/// Submission-level failures are rendered as messages and the session goes on.
pub fn scan_page<R: BufRead, W: Write>(
    service: &PredictionService,
    schema: &ExpectedSchema,
    input: &mut R,
    out: &mut W,
) -> io::Result<Page> {
    writeln!(out, "## SCAN PREDICTION TEST")?;
    let draft = collect_draft(input, out)?;
    let action = prompt_choice(input, out, "Tindakan", &["Scan", "Kembali"])?;

    if action == Some("Scan") {
        match draft.complete() {
            Err(e) => writeln!(out, "{e}")?,
            Ok(record) => match encode(&record, schema).and_then(|v| service.predict(&v)) {
                Ok(p) => {
                    debug!("prediction: label={} p={:.4}", p.label, p.probability);
                    if p.label == 1 {
                        writeln!(
                            out,
                            "Terdeteksi penyakit jantung dengan probabilitas: {:.2}",
                            p.probability
                        )?;
                    } else {
                        writeln!(
                            out,
                            "Tidak terdeteksi penyakit jantung dengan probabilitas: {:.2}",
                            p.probability
                        )?;
                    }
                }
                Err(e) => writeln!(out, "Error during prediction: {e}")?,
            },
        }
    }
    Ok(Page::Home)
}

pub fn contact_page<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Page> {
    writeln!(out, "## CONTACT PAGE")?;
    writeln!(out, "Get in touch with us:")?;
    writeln!(out, "- Email: petikmanggafm@gmail.com")?;
    writeln!(out, "- Phone: 0852-1234-1117")?;
    writeln!(
        out,
        "- Address: Universitas Negeri Jakarta, Rawamangun, Jakarta Timur"
    )?;

    writeln!(out, "## Contact Form:")?;
    write!(out, "Name: ")?;
    out.flush()?;
    let name = read_trimmed(input)?.unwrap_or_default();
    write!(out, "Email: ")?;
    out.flush()?;
    let email = read_trimmed(input)?.unwrap_or_default();
    write!(out, "Message: ")?;
    out.flush()?;
    let message = read_trimmed(input)?.unwrap_or_default();

    if !name.is_empty() && !email.is_empty() && !message.is_empty() {
        writeln!(out, "Thank you, {name}! Your message has been submitted.")?;
    } else {
        writeln!(out, "Please fill in all fields.")?;
    }
    Ok(Page::Home)
}

pub fn run_session<R: BufRead, W: Write>(
    ctx: &mut SessionContext,
    service: &PredictionService,
    schema: &ExpectedSchema,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    loop {
        debug!("page: {:?}", ctx.current);
        let next = match ctx.current {
            Page::Home => home_page(input, out)?,
            Page::Scan => Some(scan_page(service, schema, input, out)?),
            Page::Contact => Some(contact_page(input, out)?),
        };
        match next {
            Some(page) => ctx.current = page,
            None => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use smartcore::linalg::basic::matrix::DenseMatrix;
    use smartcore::tree::decision_tree_classifier::DecisionTreeClassifier;

    use super::*;
    use crate::model::RandomForestModel;

    fn heart_schema() -> ExpectedSchema {
        ExpectedSchema::from_columns(
            [
                "age", "sex", "trestbps", "chol", "thalach", "oldpeak", "cp_0", "cp_1", "cp_2",
                "cp_3", "fbs_0", "fbs_1", "restecg_0", "restecg_1", "restecg_2", "exang_0",
                "exang_1", "slope_0", "slope_1", "slope_2", "ca_0", "ca_1", "ca_2", "ca_3",
                "thal_1", "thal_2", "thal_3",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }

    fn heart_service(schema: &ExpectedSchema) -> PredictionService {
        let ncols = schema.len();
        let nrows = 20;
        let mut xs = Vec::with_capacity(nrows * ncols);
        let mut y = Vec::with_capacity(nrows);
        for i in 0..nrows {
            let age = 30.0 + 2.0 * i as f64;
            for c in 0..ncols {
                xs.push(if c == 0 { age } else { 0.0 });
            }
            y.push(i32::from(age > 50.0));
        }
        let x = DenseMatrix::new(nrows, ncols, xs, false);
        let trees = (0..3)
            .map(|_| DecisionTreeClassifier::fit(&x, &y, Default::default()).unwrap())
            .collect();
        PredictionService::new(RandomForestModel {
            feature_names: schema.columns().to_vec(),
            trees,
        })
    }

    // Answers in collector order: age, sex, cp, trestbps, chol, fbs, restecg,
    // thalach, exang, oldpeak, slope, ca, thal, then the Scan/Kembali action.
    const SCENARIO_A: &str = "63\n1\n1\n145\n233\n2\n1\n150\n1\n2.3\n3\n1\n1\n1\n";
    const SCENARIO_B: &str = "63\n1\n1\n\n233\n2\n1\n150\n1\n2.3\n3\n1\n1\n1\n";

    #[test]
    fn scan_scenario_a_reports_a_prediction() {
        let schema = heart_schema();
        let service = heart_service(&schema);
        let mut input = Cursor::new(SCENARIO_A);
        let mut out = Vec::new();

        let next = scan_page(&service, &schema, &mut input, &mut out).unwrap();
        assert_eq!(next, Page::Home);

        let text = String::from_utf8(out).unwrap();
        assert!(
            text.contains("penyakit jantung dengan probabilitas:"),
            "no prediction rendered:\n{text}"
        );
        assert!(!text.contains("Harap mengisi semua data"));
    }

    #[test]
    fn scan_scenario_b_short_circuits_on_missing_field() {
        let schema = heart_schema();
        let service = heart_service(&schema);
        let mut input = Cursor::new(SCENARIO_B);
        let mut out = Vec::new();

        scan_page(&service, &schema, &mut input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Harap mengisi semua data terlebih dahulu!"));
        assert!(!text.contains("probabilitas"));
    }

    #[test]
    fn classifier_rejection_is_rendered_not_fatal() {
        // Service trained on fewer columns than the schema produces.
        let schema = heart_schema();
        let narrow = ExpectedSchema::from_columns(vec!["age".to_string(), "sex".to_string()]);
        let service = heart_service(&narrow);
        let mut input = Cursor::new(SCENARIO_A);
        let mut out = Vec::new();

        let next = scan_page(&service, &schema, &mut input, &mut out).unwrap();
        assert_eq!(next, Page::Home);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error during prediction:"));
    }

    #[test]
    fn label_code_maps_match_the_form() {
        assert_eq!(SEX_CODES["Laki-laki"], 1);
        assert_eq!(CP_CODES["Typical angina"], 0);
        assert_eq!(FBS_CODES["Ya"], 1);
        assert_eq!(RESTECG_CODES["Normal"], 0);
        assert_eq!(EXANG_CODES["Tidak"], 0);
        assert_eq!(SLOPE_CODES["Menurun"], 2);
        assert_eq!(THAL_CODES["Normal"], 1);
    }

    #[test]
    fn home_menu_navigates_and_quits() {
        let mut out = Vec::new();
        let mut input = Cursor::new("1\n");
        assert_eq!(home_page(&mut input, &mut out).unwrap(), Some(Page::Scan));

        let mut input = Cursor::new("9\n2\n");
        assert_eq!(
            home_page(&mut input, &mut out).unwrap(),
            Some(Page::Contact)
        );

        let mut input = Cursor::new("0\n");
        assert_eq!(home_page(&mut input, &mut out).unwrap(), None);
    }

    #[test]
    fn contact_form_requires_every_field() {
        let mut out = Vec::new();
        let mut input = Cursor::new("Budi\nbudi@example.com\nHalo\n");
        contact_page(&mut input, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Thank you, Budi!"));

        let mut out = Vec::new();
        let mut input = Cursor::new("Budi\n\nHalo\n");
        contact_page(&mut input, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Please fill in all fields."));
    }
}
