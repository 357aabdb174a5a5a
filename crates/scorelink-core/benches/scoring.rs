use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scorelink_core::model::{default_exam, Question, Section, StudentInput};
use scorelink_core::scoring::evaluate;

fn full_session() -> (Vec<Question>, StudentInput) {
    let mut questions = default_exam();
    for q in questions.iter_mut() {
        q.correct_answer = Some("B".into());
    }
    for index in 0..4 {
        questions.push(Question::direct(Section::Speaking, index, "Delivery", 5.0));
        questions.push(Question::direct(Section::Writing, index, "Organization", 5.0));
    }

    let mut input = StudentInput {
        name: "Kim".into(),
        ..StudentInput::empty()
    };
    for q in &questions {
        let answer = if q.is_mcq() { "b" } else { "4.5" };
        input.answers.insert(q.id.clone(), answer.into());
    }
    (questions, input)
}

fn bench_evaluate(c: &mut Criterion) {
    let (questions, input) = full_session();
    c.bench_function("evaluate 68-question session", |b| {
        b.iter(|| evaluate(black_box(&questions), black_box(&input)))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
