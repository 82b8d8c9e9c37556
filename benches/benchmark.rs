use criterion::{Criterion, criterion_group, criterion_main};
use gioitinh::{Algorithm, GenderModel, read_csv};
use std::path::Path;

fn bench_predict_single(c: &mut Criterion) {
    let records = read_csv(Path::new("data/vn_names.csv")).unwrap();
    let model = GenderModel::train(&records, Algorithm::NaiveBayes).unwrap();

    c.bench_function("predict Nguyễn Thị Hoa", |b| {
        b.iter(|| {
            let _ = model.predict("Nguyễn Thị Hoa");
        })
    });
}

fn bench_bulk_prediction(c: &mut Criterion) {
    let records = read_csv(Path::new("data/vn_names.csv")).unwrap();
    let model = GenderModel::train(&records, Algorithm::NaiveBayes).unwrap();
    let names: Vec<_> = records.iter().map(|r| r.full_name.clone()).collect();

    c.bench_function("bulk predict dataset", |b| {
        b.iter(|| {
            for name in &names {
                let _ = model.predict(name);
            }
        });
    });
}

criterion_group!(benches, bench_predict_single, bench_bulk_prediction);
criterion_main!(benches);
