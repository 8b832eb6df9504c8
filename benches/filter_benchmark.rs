use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use student_activity::db::{MemoryStore, Store};
use student_activity::models::{
    Activity, ActivityType, Direction, PageRequest, SortOrder, Student,
};
use student_activity::services::query::{build_filter, remap_sort};
use uuid::Uuid;

const CATEGORIES: [&str; 5] = ["Running", "Reading", "Cycling", "Swimming", "Chess"];

/// A store holding `per_student` activities for each of `students` students.
fn seeded_store(students: usize, per_student: usize) -> (MemoryStore, Uuid) {
    let store = MemoryStore::new();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("valid date")
        .and_time(NaiveTime::MIN);

    let types: Vec<ActivityType> = CATEGORIES
        .iter()
        .map(|name| {
            store
                .save_activity_type(ActivityType {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                })
                .expect("save type")
        })
        .collect();

    let mut first = None;
    for s in 0..students {
        let student = store
            .save_student(Student {
                id: Uuid::new_v4(),
                first_name: "Bench".to_string(),
                last_name: format!("Student {s}"),
                email: format!("bench{s}@example.com"),
                password_hash: String::new(),
                created_at: start,
                updated_at: start,
            })
            .expect("save student");
        first.get_or_insert(student.id);

        for i in 0..per_student {
            let activity_type = &types[i % types.len()];
            store
                .save_activity(Activity {
                    id: Uuid::new_v4(),
                    student_id: student.id,
                    activity_type_id: activity_type.id,
                    description: format!("session {i} of {}", activity_type.name),
                    timestamp: start + Duration::hours(i as i64 * 5),
                    created_at: start,
                    updated_at: start,
                })
                .expect("save activity");
        }
    }

    (store, first.expect("at least one student"))
}

fn benchmark_find_activities(c: &mut Criterion) {
    let (store, student_id) = seeded_store(20, 500);
    let day = NaiveDate::from_ymd_opt(2024, 2, 1);

    let mut group = c.benchmark_group("find_activities");

    group.bench_function("owner_only", |b| {
        let filter = build_filter(student_id, None, None);
        let request = PageRequest::default();
        b.iter(|| store.find_activities(black_box(&filter), black_box(&request)))
    });

    group.bench_function("owner_search_date", |b| {
        let filter = build_filter(student_id, Some("run"), day);
        let request = PageRequest::default();
        b.iter(|| store.find_activities(black_box(&filter), black_box(&request)))
    });

    group.bench_function("owner_sorted_by_category", |b| {
        let filter = build_filter(student_id, None, None);
        let request = PageRequest::default().with_sort(remap_sort(vec![
            SortOrder::new("category", Direction::Desc),
            SortOrder::new("timestamp", Direction::Asc),
        ]));
        b.iter(|| store.find_activities(black_box(&filter), black_box(&request)))
    });

    group.finish();
}

fn benchmark_dashboard_aggregates(c: &mut Criterion) {
    let (store, student_id) = seeded_store(20, 500);

    c.bench_function("count_activities_by_day", |b| {
        b.iter(|| store.count_activities_by_day(black_box(student_id)))
    });
}

criterion_group!(benches, benchmark_find_activities, benchmark_dashboard_aggregates);
criterion_main!(benches);
