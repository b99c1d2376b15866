// ==========================================
// 课表解析 Worker - 端到端测试（进程内消息队列）
// ==========================================
// 流程: 入队 xlsx → 消费 → 解析 → 发布 → 确认
// ==========================================


use std::time::Duration;
use test_helpers::{build_xlsx, timetable_xlsx, XCell, HEADER};
use tkb_parser::importer::ParseError;
use tkb_parser::worker::{parse_payload, JobState, JobWorker, MemoryBroker, WorkerError};
use tkb_parser::{ClassAttribute, ResultEnvelope};

#[test]
fn test_parse_payload_from_xlsx_bytes() {
    tkb_parser::logging::init_test();

    let parsed = parse_payload("job-1", &timetable_xlsx(3)).unwrap();

    assert_eq!(parsed.record_count, 3);
    assert_eq!(parsed.term_ids.iter().collect::<Vec<_>>(), vec!["20241"]);

    let envelope: ResultEnvelope = serde_json::from_slice(&parsed.payload).unwrap();
    assert_eq!(envelope.data[0].class_id, "140000");
    assert_eq!(envelope.data[0].learn_day_number, 1);
    assert_eq!(envelope.data[2].learn_at_day_of_week, 4);
    assert_eq!(envelope.data[0].describe, "");
}

#[test]
fn test_numeric_class_id_is_rendered_without_fraction() {
    let mut rows: Vec<Vec<XCell>> = vec![test_helpers::HEADER
        .iter()
        .map(|h| XCell::Text(h))
        .collect()];
    rows.push(vec![
        XCell::Number(20241.0),
        XCell::Number(139876.0),
        XCell::Text("IT3080"),
        XCell::Text("Mạng máy tính"),
        XCell::Number(1.0),
        XCell::Number(2.0),
        XCell::Text("D9-101"),
        XCell::Text("0645-0910"),
        XCell::Text("2-9"),
        XCell::Text("LT"),
        XCell::Text("note"),
        XCell::Number(139877.0),
    ]);

    let parsed = parse_payload("job-2", &build_xlsx(&rows).unwrap()).unwrap();
    let envelope: ResultEnvelope = serde_json::from_slice(&parsed.payload).unwrap();

    assert_eq!(envelope.data[0].term_id, "20241");
    assert_eq!(envelope.data[0].class_id, "139876");
    assert_eq!(envelope.data[0].second_class_id, "139877");
}

#[test]
fn test_parse_payload_rejects_garbage() {
    let err = parse_payload("job-3", b"not an xlsx").unwrap_err();
    assert!(matches!(err, WorkerError::Decode(_)));
}

#[test]
fn test_row_numbers_count_leading_blank_rows() {
    // 前两行完全空白，表头在第 3 行，坏数据在第 4 行
    let rows: Vec<Vec<XCell>> = vec![
        vec![XCell::Blank],
        vec![XCell::Blank],
        HEADER.iter().map(|h| XCell::Text(h)).collect(),
        vec![
            XCell::Text("20241"),
            XCell::Text("140001"),
            XCell::Text("IT3080"),
            XCell::Text("Mạng máy tính"),
            XCell::Number(1.0),
            XCell::Text("Hai"),
        ],
    ];
    let err = parse_payload("job-4", &build_xlsx(&rows).unwrap()).unwrap_err();

    assert!(matches!(
        err,
        WorkerError::Parse(ParseError::TypeCoercion {
            row: 4,
            attribute: ClassAttribute::LearnAtDayOfWeek,
            ..
        })
    ));

    // 同一布局的正常数据: 表头行号取工作表行号
    let mut good = rows;
    good[3][5] = XCell::Number(2.0);
    let parsed = parse_payload("job-5", &build_xlsx(&good).unwrap()).unwrap();
    assert_eq!(parsed.header_row, 3);
}

#[tokio::test]
async fn test_success_publishes_then_acks() {
    let broker = MemoryBroker::new(4);
    broker.enqueue(timetable_xlsx(2)).unwrap();
    broker.enqueue(timetable_xlsx(5)).unwrap();
    broker.close();

    let worker = JobWorker::new(broker.publisher());
    let summary = worker
        .run(broker.consume().unwrap(), 4, std::future::pending())
        .await
        .unwrap();

    assert_eq!(summary.acknowledged, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(broker.acked_count(), 2);
    assert_eq!(broker.unacked_count(), 0);

    let mut counts: Vec<usize> = broker
        .published()
        .iter()
        .map(|p| serde_json::from_slice::<ResultEnvelope>(p).unwrap().data.len())
        .collect();
    counts.sort();
    assert_eq!(counts, vec![2, 5]);
}

#[tokio::test]
async fn test_parse_failure_leaves_message_unacked() {
    let broker = MemoryBroker::new(2);
    let no_header = build_xlsx(&[vec![XCell::Text("nothing"), XCell::Text("here")]]).unwrap();
    broker.enqueue(no_header).unwrap();
    broker.enqueue(timetable_xlsx(1)).unwrap();
    broker.close();

    let worker = JobWorker::new(broker.publisher());
    let summary = worker
        .run(broker.consume().unwrap(), 1, std::future::pending())
        .await
        .unwrap();

    assert_eq!(summary.acknowledged, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(broker.published().len(), 1);
    assert_eq!(broker.unacked_count(), 1);
}

#[tokio::test]
async fn test_publish_failure_skips_ack() {
    let broker = MemoryBroker::new(1);
    broker.set_publish_failure(true);
    broker.enqueue(timetable_xlsx(1)).unwrap();

    let worker = JobWorker::new(broker.publisher());
    let mut deliveries = Box::pin(broker.consume().unwrap());
    let delivery = futures::StreamExt::next(&mut deliveries)
        .await
        .unwrap()
        .unwrap();

    let outcome = worker.process(&delivery).await;

    assert_eq!(outcome.state, JobState::Failed);
    assert_eq!(outcome.failed_at, Some(JobState::Parsed));
    assert!(outcome.error.as_ref().is_some_and(|e| e.is_transport()));
    drop(delivery);
    assert_eq!(broker.acked_count(), 0);
    assert_eq!(broker.unacked_count(), 1);

    // 恢复后重投成功
    broker.set_publish_failure(false);
    assert_eq!(broker.requeue_unacked().unwrap(), 1);
    let redelivered = futures::StreamExt::next(&mut deliveries)
        .await
        .unwrap()
        .unwrap();
    let outcome = worker.process(&redelivered).await;

    assert!(outcome.is_acknowledged());
    assert_eq!(outcome.record_count, 1);
    assert_eq!(broker.published().len(), 1);
}

#[tokio::test]
async fn test_parse_timeout_leaves_message_unacked() {
    let broker = MemoryBroker::new(1);
    broker.enqueue(timetable_xlsx(2000)).unwrap();

    let worker = JobWorker::new(broker.publisher()).with_timeout(Some(Duration::ZERO));
    let mut deliveries = Box::pin(broker.consume().unwrap());
    let delivery = futures::StreamExt::next(&mut deliveries)
        .await
        .unwrap()
        .unwrap();

    let outcome = worker.process(&delivery).await;

    assert_eq!(outcome.state, JobState::Failed);
    assert_eq!(outcome.failed_at, Some(JobState::Received));
    assert!(matches!(outcome.error, Some(WorkerError::Timeout(_))));
    assert!(broker.published().is_empty());

    drop(delivery);
    assert_eq!(broker.acked_count(), 0);
    assert_eq!(broker.unacked_count(), 1);
}

#[tokio::test]
async fn test_shutdown_stops_consumption() {
    let broker = MemoryBroker::new(1);
    let worker = JobWorker::new(broker.publisher()).with_timeout(Some(Duration::from_secs(30)));

    let summary = worker
        .run(
            broker.consume().unwrap(),
            1,
            tokio::time::sleep(Duration::from_millis(20)),
        )
        .await
        .unwrap();

    assert_eq!(summary.acknowledged + summary.failed, 0);
}
