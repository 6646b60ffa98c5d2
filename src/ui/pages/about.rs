use eframe::egui::{RichText, Ui};

use crate::state::{AppState, Language};
use crate::ui::widgets::combo;

const NASA_POWER_URL: &str = "https://power.larc.nasa.gov/";

/// Forecast error per indicator: (indicator, MSE, RMSE, MAE).
const FORECAST_METRICS: [(&str, f64, f64, f64); 5] = [
    ("ALLSKY_KT", 0.0526, 0.2295, 0.1815),
    ("T2M", 0.0341, 0.1847, 0.1514),
    ("PRECTOTCORR", 0.0738, 0.2721, 0.2191),
    ("PS", 0.0399, 0.1998, 0.1602),
    ("WS10M", 0.0287, 0.1697, 0.1347),
];

const SVM_F1: f64 = 0.985;

/// Every piece of prose on the page, in one language.
struct AboutText {
    title: &'static str,
    description_heading: &'static str,
    description: &'static str,
    vision_heading: &'static str,
    vision: &'static str,
    mission_heading: &'static str,
    mission: [&'static str; 4],
    goals_heading: &'static str,
    goals: [&'static str; 3],
    datasets_heading: &'static str,
    datasets_intro: &'static str,
    upwelling_dataset: &'static str,
    climate_dataset: &'static str,
    models_heading: &'static str,
    forecast_models: &'static str,
    forecast_intro: &'static str,
    prediction_model: &'static str,
    prediction_intro: &'static str,
    process_heading: &'static str,
    process: [(&'static str, &'static str); 3],
    tools_heading: &'static str,
    tools: [(&'static str, &'static str); 4],
}

const ENGLISH: AboutText = AboutText {
    title: "About Us",
    description_heading: "Project Description",
    description: "This dashboard is an output of a student exact-science research programme at \
Syiah Kuala University. It helps floating net cage (KJA) farmers on Lake Laut Tawar make decisions \
about fish farming.",
    vision_heading: "Vision",
    vision: "To be an innovative solution provider in mitigating upwelling risks and providing \
accurate information for decision-making by Lake Laut Tawar KJA farmers.",
    mission_heading: "Mission",
    mission: [
        "Accurately collect and analyse upwelling events and climate indicators.",
        "Develop reliable upwelling prediction models based on historical data.",
        "Provide an interactive dashboard to monitor and forecast upwelling risks.",
        "Share information on upwelling risks with KJA farmers effectively.",
    ],
    goals_heading: "Goals",
    goals: [
        "Provide a reliable source of information on upwelling risks in Lake Laut Tawar.",
        "Increase the awareness and preparedness of KJA farmers for potential upwelling.",
        "Support mitigation of upwelling risks in Lake Laut Tawar.",
    ],
    datasets_heading: "Datasets Used",
    datasets_intro: "The project uses the following datasets:",
    upwelling_dataset: "Upwelling events in Lake Laut Tawar",
    climate_dataset: "Lake Laut Tawar climate data from NASA Prediction Of Worldwide Energy Resources",
    models_heading: "Models Used",
    forecast_models: "Forecasting models (SVARMA and seasonal autoregressive)",
    forecast_intro: "Two time-series models forecast the climate indicators:",
    prediction_model: "Prediction model",
    prediction_intro: "A support vector machine (SVM) classifies upwelling potential:",
    process_heading: "Analysis Process",
    process: [
        ("Data preprocessing", "preparing and cleaning the data before modelling."),
        ("Climate forecast modelling", "building and validating the climate forecast models."),
        ("Upwelling prediction modelling", "building the upwelling classifier."),
    ],
    tools_heading: "Technologies / Tools Used",
    tools: [
        ("egui / eframe", "the user interface."),
        ("egui_plot", "interactive charts."),
        ("csv", "reading and writing the data files."),
        ("serde", "configuration and the model file."),
    ],
};

const INDONESIAN: AboutText = AboutText {
    title: "Tentang Kami",
    description_heading: "Deskripsi Proyek",
    description: "Dashboard ini merupakan salah satu luaran Program Kreativitas Mahasiswa Riset \
Eksakta yang dikerjakan oleh mahasiswa Universitas Syiah Kuala. Proyek ini membantu pembudidaya \
Keramba Jaring Apung (KJA) Danau Laut Tawar dalam mengambil keputusan budidaya ikan.",
    vision_heading: "Visi",
    vision: "Menjadi penyedia solusi inovatif dalam mengatasi risiko upwelling dan memberikan \
informasi yang akurat untuk pengambilan keputusan oleh pembudidaya KJA Danau Laut Tawar.",
    mission_heading: "Misi",
    mission: [
        "Mengumpulkan dan menganalisis data kejadian upwelling dan indikator iklim dengan akurat.",
        "Mengembangkan model prediksi upwelling yang andal berdasarkan data historis.",
        "Menyediakan dashboard interaktif untuk memantau dan meramalkan risiko upwelling.",
        "Menyebarkan informasi mengenai risiko upwelling kepada pembudidaya KJA secara efektif.",
    ],
    goals_heading: "Tujuan",
    goals: [
        "Menyediakan sumber informasi terpercaya terkait risiko upwelling di Danau Laut Tawar.",
        "Meningkatkan kewaspadaan dan kesiapsiagaan pembudidaya KJA terhadap potensi upwelling.",
        "Mendukung upaya mitigasi risiko upwelling di Danau Laut Tawar.",
    ],
    datasets_heading: "Dataset yang Digunakan",
    datasets_intro: "Proyek ini menggunakan dataset berikut:",
    upwelling_dataset: "Data kejadian upwelling di Danau Laut Tawar",
    climate_dataset: "Data iklim Danau Laut Tawar dari NASA Prediction Of Worldwide Energy Resources",
    models_heading: "Model yang Digunakan",
    forecast_models: "Model forecast (SVARMA dan seasonal autoregressive)",
    forecast_intro: "Dua model deret waktu meramalkan indikator iklim:",
    prediction_model: "Model prediksi",
    prediction_intro: "Support vector machine (SVM) mengklasifikasikan potensi upwelling:",
    process_heading: "Proses Analisis",
    process: [
        ("Preprocessing data", "persiapan dan pembersihan data sebelum pemodelan."),
        ("Pemodelan forecast iklim", "pembentukan dan validasi model forecast iklim."),
        ("Pemodelan prediksi upwelling", "pembangunan model klasifikasi upwelling."),
    ],
    tools_heading: "Teknologi / Tools yang Digunakan",
    tools: [
        ("egui / eframe", "antarmuka pengguna."),
        ("egui_plot", "grafik interaktif."),
        ("csv", "membaca dan menulis berkas data."),
        ("serde", "konfigurasi dan berkas model."),
    ],
};

fn text_for(language: Language) -> &'static AboutText {
    match language {
        Language::English => &ENGLISH,
        Language::Indonesian => &INDONESIAN,
    }
}

/// Metrics as published, with a decimal comma in Indonesian.
fn metric(value: f64, language: Language) -> String {
    let s = value.to_string();
    match language {
        Language::English => s,
        Language::Indonesian => s.replace('.', ","),
    }
}

fn numbered(ui: &mut Ui, items: &[&str]) {
    for (i, item) in items.iter().enumerate() {
        ui.label(format!("{}. {item}", i + 1));
    }
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    combo(
        ui,
        "about_language",
        "Select Language / Pilih Bahasa",
        &mut state.language,
        &[
            (Language::English, "English".to_string()),
            (Language::Indonesian, "Bahasa Indonesia".to_string()),
        ],
    );

    let lang = state.language;
    let t = text_for(lang);

    ui.heading(RichText::new(t.title).size(26.0));
    ui.add_space(4.0);
    ui.heading(t.description_heading);
    ui.label(t.description);

    ui.add_space(8.0);
    ui.columns(3, |cols: &mut [Ui]| {
        cols[0].heading(t.vision_heading);
        cols[0].label(t.vision);
        cols[1].heading(t.mission_heading);
        numbered(&mut cols[1], &t.mission);
        cols[2].heading(t.goals_heading);
        numbered(&mut cols[2], &t.goals);
    });

    ui.add_space(8.0);
    ui.heading(t.datasets_heading);
    ui.label(t.datasets_intro);
    ui.label(format!("1. {}", t.upwelling_dataset));
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("2. {}", t.climate_dataset));
        ui.hyperlink_to("(NASA POWER)", NASA_POWER_URL);
    });

    ui.add_space(8.0);
    ui.heading(t.models_heading);
    ui.strong(t.forecast_models);
    ui.label(t.forecast_intro);
    for (indicator, mse, rmse, mae) in FORECAST_METRICS {
        ui.label(format!(
            "• {indicator}: MSE = {}, RMSE = {}, MAE = {}",
            metric(mse, lang),
            metric(rmse, lang),
            metric(mae, lang)
        ));
    }
    ui.add_space(4.0);
    ui.strong(t.prediction_model);
    ui.label(t.prediction_intro);
    ui.label(format!("• SVM F1-Score = {}", metric(SVM_F1, lang)));

    ui.add_space(8.0);
    ui.heading(t.process_heading);
    for (name, what) in t.process {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.strong(format!("{name}:"));
            ui.label(what);
        });
    }

    ui.add_space(8.0);
    ui.heading(t.tools_heading);
    for (name, what) in t.tools {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.strong(format!("{name}:"));
            ui.label(what);
        });
    }
}
