use axum::{response::Html, Router, routing::get};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Document Assistant</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 0; display: flex; height: 100vh; color: #1d1d1f; }
    aside { width: 280px; padding: 1.5rem; background: #0284c7; color: #fff; }
    main { flex: 1; display: flex; flex-direction: column; padding: 1.5rem; }
    h1 { margin: 0 0 0.5rem 0; }
    #transcript { flex: 1; overflow-y: auto; border: 1px solid #ddd; border-radius: 8px; padding: 1rem; }
    .msg { padding: 0.6rem 0.9rem; border-radius: 12px; margin-bottom: 0.75rem; white-space: pre-wrap; }
    .user { background: #f1f1f1; }
    .assistant { background: #e0f2fe; }
    .error { background: #fee2e2; }
    form { display: flex; gap: 0.5rem; margin-top: 1rem; }
    input[type=text] { flex: 1; padding: 0.6rem; }
    button { padding: 0.6rem 1rem; }
    #status { margin-top: 1rem; padding: 0.75rem; background: rgba(255,255,255,0.15); border-radius: 8px; }
  </style>
</head>
<body>
  <aside>
    <h2>Upload a Document</h2>
    <input id="fileInput" type="file" accept=".pdf,.xlsx,.xls,.xlsm,.xlsb,.ods" />
    <button id="uploadBtn">Upload</button>
    <button id="clearBtn">Clear Chat</button>
    <div id="status">No file uploaded</div>
  </aside>

  <main>
    <h1>Document Assistant</h1>
    <p>Ask questions about your PDFs and spreadsheets.</p>
    <div id="transcript"></div>
    <form id="chatForm">
      <input id="question" type="text" placeholder="Ask a question..." autocomplete="off" />
      <button type="submit">Send</button>
    </form>
  </main>

  <script>
    const transcript = document.getElementById('transcript');
    const statusBox = document.getElementById('status');
    let sessionId = sessionStorage.getItem('sessionId');

    function addMessage(role, text) {
      const div = document.createElement('div');
      div.className = 'msg ' + role;
      div.textContent = text;
      transcript.appendChild(div);
      transcript.scrollTop = transcript.scrollHeight;
    }

    async function ensureSession() {
      if (sessionId) {
        const res = await fetch(`/api/sessions/${sessionId}`);
        if (res.ok) {
          const session = await res.json();
          statusBox.textContent = session.upload_status;
          transcript.innerHTML = '';
          session.messages.forEach(m => addMessage(m.role, m.content));
          return;
        }
      }
      const res = await fetch('/api/sessions', { method: 'POST' });
      const json = await res.json();
      sessionId = json.session_id;
      sessionStorage.setItem('sessionId', sessionId);
      statusBox.textContent = 'No file uploaded';
    }

    document.getElementById('uploadBtn').addEventListener('click', async () => {
      const fileInput = document.getElementById('fileInput');
      if (!fileInput.files.length) {
        statusBox.textContent = 'Select a file first.';
        return;
      }
      const formData = new FormData();
      formData.append('file', fileInput.files[0]);
      statusBox.textContent = 'Processing your document...';
      const res = await fetch(`/api/sessions/${sessionId}/files`, { method: 'POST', body: formData });
      const json = await res.json();
      statusBox.textContent = res.ok ? json.status : `Upload failed: ${json.details}`;
    });

    document.getElementById('clearBtn').addEventListener('click', async () => {
      await fetch(`/api/sessions/${sessionId}/messages`, { method: 'DELETE' });
      transcript.innerHTML = '';
    });

    document.getElementById('chatForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      const input = document.getElementById('question');
      const message = input.value.trim();
      if (!message) return;
      input.value = '';
      addMessage('user', message);
      const res = await fetch(`/api/sessions/${sessionId}/chat`, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ message })
      });
      const json = await res.json();
      if (res.status === 404) {
        sessionId = null;
        await ensureSession();
        addMessage('error', 'Your session expired. Upload the document again to continue.');
      } else if (res.ok) {
        addMessage('assistant', json.text);
      } else {
        addMessage('error', `Error: ${json.details}`);
      }
    });

    ensureSession();
  </script>
</body>
</html>"#)
}
