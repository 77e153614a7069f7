use std::{sync::Arc, thread, time::Duration};

use weak_event::{DispatchQueue, Event, Sender};

// An observable model
struct Document {
    title: String,
    edited: Event<String>,
}

// Views only keep their handle; there is no unsubscribe call
struct View {
    name: &'static str,
    _subscription: weak_event::Handle<String>,
}

impl View {
    fn attach(name: &'static str, doc: &Document, queue: &DispatchQueue) -> Self {
        let subscription = doc
            .edited
            .subscribe_on(queue.clone(), move |sender: &Sender, text: &String| {
                let title = sender
                    .downcast_ref::<Document>()
                    .map(|d| d.title.as_str())
                    .unwrap_or("?");
                println!("[{name}] {title}: {text}");
            });
        View {
            name,
            _subscription: subscription,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let ui = DispatchQueue::new("ui");
    let doc = Arc::new(Document {
        title: "notes.txt".into(),
        edited: Event::new(),
    });

    let editor = View::attach("editor", &doc, &ui);
    let preview = View::attach("preview", &doc, &ui);
    println!("{} handlers", doc.edited.handler_count());

    doc.edited.raise(doc.clone(), "first draft".into());
    thread::sleep(Duration::from_millis(50));

    // Closing the preview ends its subscription
    println!("closing {}", preview.name);
    drop(preview);

    doc.edited.raise(doc.clone(), "second draft".into());
    thread::sleep(Duration::from_millis(50));
    println!("{} handlers after trim", doc.edited.handler_count());

    println!("{} still open", editor.name);
}
