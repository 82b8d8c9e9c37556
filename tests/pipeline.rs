use filetime::FileTime;
use gioitinh::{Algorithm, Gender, GenderModel, read_csv};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

fn write_dataset(path: &Path) {
    let male = [
        "Nguyễn Văn Hùng",
        "Trần Văn Nam",
        "Lê Đức Tuấn",
        "Phạm Quang Dũng",
        "Hoàng Minh Long",
        "Vũ Văn Sơn",
        "Đỗ Hữu Cường",
        "Bùi Công Thành",
        "Ngô Xuân Khánh",
        "Phan Đình Việt",
    ];
    let female = [
        "Nguyễn Thị Hoa",
        "Trần Thị Lan",
        "Lê Thu Hương",
        "Phạm Ngọc Mai",
        "Hoàng Thị Thảo",
        "Vũ Kim Trang",
        "Đỗ Thùy Linh",
        "Bùi Thị Nhung",
        "Ngô Phương Quỳnh",
        "Phan Hồng Yến",
    ];

    let mut csv = String::from("full_name,gender\n");
    for name in male {
        csv.push_str(&format!("{name},nam\n"));
    }
    for name in female {
        csv.push_str(&format!("{name},nữ\n"));
    }
    fs::write(path, csv).unwrap();
}

#[test]
fn train_save_load_predict_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("names.csv");
    let model_path = dir.path().join("model.msgpack");
    write_dataset(&csv_path);

    let records = read_csv(&csv_path).unwrap();
    let model = GenderModel::train(&records, Algorithm::NaiveBayes).unwrap();
    model.save_to_file(&model_path).unwrap();

    let loaded = GenderModel::load_from_file(&model_path).unwrap();
    assert_eq!(loaded.algorithm(), Algorithm::NaiveBayes);

    for name in ["Trần Văn Nam", "Nguyễn Thị Hoa"] {
        let before = model.predict(name).unwrap();
        let after = loaded.predict(name).unwrap();
        assert_eq!(before.gender, after.gender);

        let (b, a) = (before.scores.unwrap(), after.scores.unwrap());
        assert!((b.female - a.female).abs() < 1e-9);
        assert!((b.male - a.male).abs() < 1e-9);
    }

    assert_eq!(
        loaded.predict("Nguyễn Thị Hoa").unwrap().gender,
        Gender::Female
    );
    assert_eq!(loaded.predict("Trần Văn Nam").unwrap().gender, Gender::Male);
}

#[test]
fn svm_round_trip_reports_label_only() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("names.csv");
    let model_path = dir.path().join("svm.msgpack");
    write_dataset(&csv_path);

    let records = read_csv(&csv_path).unwrap();
    let model = GenderModel::train(&records, Algorithm::Svm).unwrap();
    model.save_to_file(&model_path).unwrap();

    let loaded = GenderModel::load_from_file(&model_path).unwrap();
    assert_eq!(loaded.algorithm(), Algorithm::Svm);

    let prediction = loaded.predict("Lê Thu Hương").unwrap();
    assert_eq!(prediction.gender, Gender::Female);
    assert!(prediction.scores.is_none());
}

#[test]
fn staleness_check_trains_then_loads() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("names.csv");
    let model_path = dir.path().join("model.msgpack");
    write_dataset(&csv_path);

    // Backdate the CSV so the freshly written model is unambiguously newer.
    let past = SystemTime::now() - Duration::from_secs(3600);
    filetime::set_file_mtime(&csv_path, FileTime::from_system_time(past)).unwrap();

    assert!(!model_path.exists());
    let trained =
        GenderModel::load_or_train_if_stale(&model_path, &csv_path, Algorithm::NaiveBayes, 0.0)
            .unwrap();
    assert!(model_path.exists());
    assert_eq!(trained.predict("Trần Văn Nam").unwrap().gender, Gender::Male);

    let loaded =
        GenderModel::load_or_train_if_stale(&model_path, &csv_path, Algorithm::NaiveBayes, 0.0)
            .unwrap();
    assert_eq!(
        loaded.predict("Nguyễn Thị Hoa").unwrap().gender,
        Gender::Female
    );
}

#[test]
fn loading_a_missing_model_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.msgpack");

    let err = GenderModel::load_from_file(&missing).unwrap_err();
    assert!(err.to_string().contains("model file not found"));
}
